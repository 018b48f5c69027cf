use core::future::Future;

use embedded_hal::{delay::DelayNs, digital::PinState};
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;

use crate::{
    error::{ConstructionError, DhtError},
    frame::{InvalidChecksum, Reading},
    pin::DhtPin,
    protocol::Exchange,
    throttle::{Canceled, Clock, Throttle},
    timing::Timings,
    variant::SensorVariant,
};

/// Driver for a DHT11 or DHT22 temperature and humidity sensor.
///
/// The driver owns the data line for its whole lifetime. `read` takes
/// `&mut self`, so at most one exchange is ever in flight.
pub struct Dht<P, D, C> {
    pin: P,
    delay: D,
    clock: C,
    variant: SensorVariant,
    timings: Timings,
    throttle: Throttle,
}

impl<P, D, C> Dht<P, D, C>
where
    P: DhtPin,
    D: DelayNs + AsyncDelayNs,
    C: Clock,
{
    /// Creates a new driver and parks the data line in its idle high state.
    ///
    /// # Arguments
    ///
    /// * `pin` - The GPIO line connected to the sensor's data pin.
    /// * `delay` - Blocking delay for the start pulse, async delay for the
    ///   read interval.
    /// * `clock` - Monotonic clock used to enforce the read interval.
    /// * `variant` - The attached sensor model.
    pub fn new(
        mut pin: P,
        delay: D,
        clock: C,
        variant: SensorVariant,
    ) -> Result<Self, ConstructionError<P::Error>> {
        pin.set_output(PinState::High)
            .map_err(ConstructionError::Pin)?;

        Ok(Dht {
            pin,
            delay,
            clock,
            variant,
            timings: Timings::DEFAULT,
            throttle: Throttle::new(variant),
        })
    }

    pub fn variant(&self) -> SensorVariant {
        self.variant
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Replaces the protocol timeouts, e.g. to calibrate the bit threshold.
    pub fn set_timings(&mut self, timings: Timings) {
        self.timings = timings;
    }

    /// Reads a temperature and humidity measurement from the sensor.
    ///
    /// Waits for the sensor's minimum read interval first (1 s for DHT11,
    /// 2 s for DHT22, measured from the end of the previous attempt). If
    /// `cancel` completes during that wait the read returns
    /// [`DhtError::Canceled`] without touching the line.
    ///
    /// The bus exchange itself is synchronous and is not cancelable; it
    /// takes roughly 20 ms.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the read is successful and the checksum is valid.
    /// * `Err(DhtError)` if the wait was canceled, a phase timed out, the
    ///   checksum did not match, or the pin failed.
    pub async fn read<F>(&mut self, cancel: F) -> Result<Reading, DhtError<P::Error>>
    where
        F: Future<Output = ()>,
    {
        self.throttle
            .await_next_slot(&self.clock, &mut self.delay, cancel)
            .await
            .map_err(|Canceled| DhtError::<P::Error>::Canceled)?;

        let exchange = Exchange::new(&mut self.pin, &mut self.delay, &self.timings).run();
        self.throttle.record_exchange(self.clock.now_us());

        // Park the line high again. A restore failure only surfaces when the
        // exchange itself succeeded, so the caller sees the first error.
        let restore = self.pin.set_output(PinState::High);
        let frame = exchange?;
        restore?;

        frame
            .validate()
            .map_err(|InvalidChecksum { expected, actual }| {
                DhtError::<P::Error>::InvalidChecksum { expected, actual }
            })?;

        Ok(frame.decode(self.variant))
    }

    /// Releases the pin, delay and clock.
    pub fn release(self) -> (P, D, C) {
        (self.pin, self.delay, self.clock)
    }
}
