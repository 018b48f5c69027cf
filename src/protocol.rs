//! Edge-timed decoder for the single-wire exchange.
//!
//! A bit is encoded by how long a high pulse lasts, so every bit races two
//! waits: the line falling within `bit_threshold_us` is a `0`, the line
//! still high after it is a `1`.

use embedded_hal::{delay::DelayNs, digital::PinState};

use crate::{
    error::{DhtError, Phase},
    frame::RawFrame,
    pin::DhtPin,
    timing::Timings,
};

/// One request/response exchange on a borrowed line.
pub struct Exchange<'a, P, D> {
    pin: &'a mut P,
    delay: &'a mut D,
    timings: &'a Timings,
}

impl<'a, P, D> Exchange<'a, P, D>
where
    P: DhtPin,
    D: DelayNs,
{
    pub fn new(pin: &'a mut P, delay: &'a mut D, timings: &'a Timings) -> Self {
        Exchange {
            pin,
            delay,
            timings,
        }
    }

    /// Runs the full exchange and returns the 5 received bytes.
    ///
    /// The checksum is not validated here. On return the line is still in
    /// input mode; restoring the idle state is up to the caller.
    pub fn run(mut self) -> Result<RawFrame, DhtError<P::Error>> {
        self.request()?;
        with_exclusive_timing(|| -> Result<RawFrame, DhtError<P::Error>> {
            self.await_response()?;
            self.acknowledge()?;
            let frame = self.read_data()?;
            self.finish()?;
            Ok(frame)
        })
    }

    /// Holds the line low, then releases it to the sensor.
    fn request(&mut self) -> Result<(), DhtError<P::Error>> {
        self.pin.set_output(PinState::Low)?;
        self.delay.delay_ms(self.timings.start_hold_ms);
        self.pin.set_input()?;
        Ok(())
    }

    fn await_response(&mut self) -> Result<(), DhtError<P::Error>> {
        self.expect(PinState::Low, self.timings.response_timeout_us, Phase::Start)
    }

    /// Sensor answers with 80us high followed by 80us low.
    fn acknowledge(&mut self) -> Result<(), DhtError<P::Error>> {
        let timeout = self.timings.acknowledge_timeout_us;
        self.expect(PinState::High, timeout, Phase::Acknowledge)?;
        self.expect(PinState::Low, timeout, Phase::Acknowledge)
    }

    fn read_data(&mut self) -> Result<RawFrame, DhtError<P::Error>> {
        let mut data = [0u8; 5];
        for (i, byte) in data.iter_mut().enumerate() {
            for j in 0..8 {
                let bit = (i * 8 + j) as u8;
                if self.read_bit(bit)? {
                    *byte |= 1 << (7 - j);
                }
            }
        }
        Ok(RawFrame(data))
    }

    /// Reads bit number `bit` (0..40).
    fn read_bit(&mut self, bit: u8) -> Result<bool, DhtError<P::Error>> {
        let phase = Phase::Data { bit };
        self.expect(PinState::High, self.timings.bit_start_timeout_us, phase)?;

        if self.wait_for(PinState::Low, self.timings.bit_threshold_us)? {
            return Ok(false);
        }

        // Still high past the threshold: a `1`, let it finish.
        self.expect(PinState::Low, self.timings.bit_one_remaining_us(), phase)?;
        Ok(true)
    }

    /// Sensor releases the bus back to the pull-up.
    fn finish(&mut self) -> Result<(), DhtError<P::Error>> {
        self.expect(PinState::High, self.timings.finish_timeout_us, Phase::Finish)
    }

    fn expect(
        &mut self,
        level: PinState,
        timeout_us: u32,
        phase: Phase,
    ) -> Result<(), DhtError<P::Error>> {
        if self.wait_for(level, timeout_us)? {
            Ok(())
        } else {
            Err(DhtError::Timeout(phase))
        }
    }

    /// True once the line reads `level`, either immediately or after an edge
    /// within `timeout_us`.
    fn wait_for(&mut self, level: PinState, timeout_us: u32) -> Result<bool, P::Error> {
        if self.pin.read_level()? == level {
            return Ok(true);
        }
        Ok(self.pin.wait_for_edge(timeout_us)? && self.pin.read_level()? == level)
    }
}

#[cfg(feature = "critical-section")]
fn with_exclusive_timing<R>(f: impl FnOnce() -> R) -> R {
    critical_section::with(|_| f())
}

#[cfg(not(feature = "critical-section"))]
fn with_exclusive_timing<R>(f: impl FnOnce() -> R) -> R {
    f()
}
