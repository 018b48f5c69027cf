use core::future::Future;

use embassy_futures::select::{Either, select};
use embedded_hal_async::delay::DelayNs;

use crate::variant::SensorVariant;

/// Monotonic time source with microsecond resolution.
pub trait Clock {
    /// Microseconds since an arbitrary fixed point. Must never go backwards.
    fn now_us(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_us(&self) -> u64 {
        T::now_us(self)
    }
}

/// [`Clock`] backed by `std::time::Instant`.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

/// The caller's cancellation signal fired before the next read slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canceled;

/// Enforces the minimum interval between two exchanges with the sensor.
///
/// Failed exchanges count too, so a caller retrying a silent sensor is
/// still held to the sensor's cycle time.
#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    min_interval_us: u64,
    last_exchange_us: Option<u64>,
}

impl Throttle {
    pub const fn new(variant: SensorVariant) -> Self {
        Throttle {
            min_interval_us: variant.min_read_interval_us(),
            last_exchange_us: None,
        }
    }

    /// Earliest time the next exchange may start, `None` before the first one.
    pub fn next_slot_us(&self) -> Option<u64> {
        self.last_exchange_us
            .map(|last| last.saturating_add(self.min_interval_us))
    }

    /// Suspends until the next slot or until `cancel` completes.
    ///
    /// `cancel` is only polled when there is something to wait for, and it
    /// is polled before the timer, so an already-fired signal always wins.
    pub async fn await_next_slot<C, T, F>(
        &self,
        clock: &C,
        timer: &mut T,
        cancel: F,
    ) -> Result<(), Canceled>
    where
        C: Clock,
        T: DelayNs,
        F: Future<Output = ()>,
    {
        let Some(next) = self.next_slot_us() else {
            return Ok(());
        };
        let now = clock.now_us();
        if next <= now {
            return Ok(());
        }

        let remaining = u32::try_from(next - now).unwrap_or(u32::MAX);
        match select(cancel, timer.delay_us(remaining)).await {
            Either::First(()) => Err(Canceled),
            Either::Second(()) => Ok(()),
        }
    }

    /// Marks the end of an exchange, successful or not.
    pub fn record_exchange(&mut self, now_us: u64) {
        let last = self.last_exchange_us.map_or(now_us, |last| last.max(now_us));
        self.last_exchange_us = Some(last);
    }
}
