//! Simulated data line and clock for tests.
//!
//! A [`SimLine`] replays a scripted sensor waveform against a virtual
//! microsecond clock shared with [`SimClock`] and [`SimDelay`], so timing
//! behaviour is deterministic.

use std::{cell::Cell, rc::Rc};

use embedded_hal::digital::PinState;

use crate::{pin::DhtPin, throttle::Clock};

/// Virtual time in microseconds.
#[derive(Clone, Default)]
pub struct SimTime(Rc<Cell<u64>>);

impl SimTime {
    pub fn now(&self) -> u64 {
        self.0.get()
    }

    pub fn advance(&self, us: u64) {
        self.0.set(self.0.get() + us);
    }
}

/// Sensor-side waveform segments, starting when the host releases the line.
pub fn waveform(frame: [u8; 5]) -> Vec<(PinState, u32)> {
    let mut w = vec![
        // pull-up holds the line until the sensor answers
        (PinState::High, 20),
        (PinState::Low, 80),
        (PinState::High, 80),
    ];
    for byte in frame {
        for i in 0..8 {
            let bit = (byte >> (7 - i)) & 1;
            w.push((PinState::Low, 50));
            w.push((PinState::High, if bit == 1 { 70 } else { 24 }));
        }
    }
    w.push((PinState::Low, 50));
    w
}

pub struct SimLine {
    time: SimTime,
    waveform: Vec<(PinState, u32)>,
    armed_at: Option<u64>,
    output: PinState,
    /// Every level driven through `set_output`.
    pub outputs: Vec<PinState>,
    pub input_calls: usize,
}

impl SimLine {
    pub fn new(time: SimTime, waveform: Vec<(PinState, u32)>) -> Self {
        SimLine {
            time,
            waveform,
            armed_at: None,
            output: PinState::High,
            outputs: Vec::new(),
            input_calls: 0,
        }
    }

    /// A line where no sensor answers; the pull-up keeps it high.
    pub fn silent(time: SimTime) -> Self {
        Self::new(time, Vec::new())
    }

    fn level_at(&self, elapsed: u64) -> PinState {
        let mut t = 0u64;
        for &(level, duration) in &self.waveform {
            t += duration as u64;
            if elapsed < t {
                return level;
            }
        }
        PinState::High
    }

    /// Time since arming of the first level change strictly after `elapsed`.
    fn next_edge_after(&self, elapsed: u64) -> Option<u64> {
        let current = self.level_at(elapsed);
        let mut t = 0u64;
        for &(_, duration) in &self.waveform {
            t += duration as u64;
            if t > elapsed && self.level_at(t) != current {
                return Some(t);
            }
        }
        None
    }
}

impl DhtPin for SimLine {
    type Error = core::convert::Infallible;

    fn set_output(&mut self, level: PinState) -> Result<(), Self::Error> {
        self.armed_at = None;
        self.output = level;
        self.outputs.push(level);
        Ok(())
    }

    fn set_input(&mut self) -> Result<(), Self::Error> {
        self.input_calls += 1;
        self.armed_at = Some(self.time.now());
        Ok(())
    }

    fn read_level(&mut self) -> Result<PinState, Self::Error> {
        Ok(match self.armed_at {
            Some(armed) => self.level_at(self.time.now() - armed),
            None => self.output,
        })
    }

    fn wait_for_edge(&mut self, timeout_us: u32) -> Result<bool, Self::Error> {
        let timeout = timeout_us as u64;
        let edge = self.armed_at.and_then(|armed| {
            let elapsed = self.time.now() - armed;
            self.next_edge_after(elapsed).map(|at| at - elapsed)
        });
        match edge {
            Some(wait) if wait <= timeout => {
                self.time.advance(wait);
                Ok(true)
            }
            _ => {
                self.time.advance(timeout);
                Ok(false)
            }
        }
    }
}

pub struct SimClock(pub SimTime);

impl Clock for SimClock {
    fn now_us(&self) -> u64 {
        self.0.now()
    }
}

/// Blocking and async delay that advances virtual time instantly.
pub struct SimDelay {
    time: SimTime,
    /// Total time spent in async (throttle) sleeps.
    pub slept_async_us: u64,
    /// Every blocking delay, in nanoseconds.
    pub blocking_ns: Vec<u32>,
    /// Async sleeps return `Pending` once before completing.
    pub yields: bool,
}

impl SimDelay {
    pub fn new(time: SimTime) -> Self {
        SimDelay {
            time,
            slept_async_us: 0,
            blocking_ns: Vec::new(),
            yields: false,
        }
    }
}

impl embedded_hal::delay::DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.blocking_ns.push(ns);
        self.time.advance(ns.div_ceil(1_000) as u64);
    }
}

impl embedded_hal_async::delay::DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        if self.yields {
            embassy_futures::yield_now().await;
        }
        let us = ns.div_ceil(1_000) as u64;
        self.slept_async_us += us;
        self.time.advance(us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_replays_after_release() {
        let time = SimTime::default();
        let mut line = SimLine::new(time.clone(), waveform([0; 5]));
        assert_eq!(line.read_level(), Ok(PinState::High));

        line.set_output(PinState::Low).unwrap();
        time.advance(5);
        assert_eq!(line.read_level(), Ok(PinState::Low));
        assert_eq!(line.wait_for_edge(100), Ok(false));

        line.set_input().unwrap();
        assert_eq!(line.read_level(), Ok(PinState::High));
        assert_eq!(line.wait_for_edge(40), Ok(true));
        assert_eq!(line.read_level(), Ok(PinState::Low));
        assert_eq!(time.now(), 5 + 100 + 20);
    }

    #[test]
    fn test_wait_for_edge_inclusive_at_timeout() {
        let time = SimTime::default();
        let mut line = SimLine::new(time.clone(), vec![(PinState::Low, 35)]);
        line.set_input().unwrap();
        assert_eq!(line.wait_for_edge(35), Ok(true));
        assert_eq!(line.read_level(), Ok(PinState::High));

        let mut line = SimLine::new(time.clone(), vec![(PinState::Low, 36)]);
        line.set_input().unwrap();
        assert_eq!(line.wait_for_edge(35), Ok(false));
        assert_eq!(line.read_level(), Ok(PinState::Low));
    }
}
