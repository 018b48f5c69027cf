use core::fmt::Debug;

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin, PinState},
};

/// The GPIO capabilities the single-wire protocol needs.
///
/// Backends with hardware edge detection (e.g. Linux GPIO character
/// devices) implement this directly. Plain embedded-hal pins can use
/// [`PolledPin`].
pub trait DhtPin {
    type Error: Debug;

    /// Drives the line to `level`.
    fn set_output(&mut self, level: PinState) -> Result<(), Self::Error>;

    /// Switches the line to input with pull-up, with edge detection armed
    /// for both rising and falling edges.
    fn set_input(&mut self) -> Result<(), Self::Error>;

    fn read_level(&mut self) -> Result<PinState, Self::Error>;

    /// Blocks until the line changes level or `timeout_us` elapses.
    ///
    /// Returns `true` if an edge was observed before the timeout.
    fn wait_for_edge(&mut self, timeout_us: u32) -> Result<bool, Self::Error>;
}

impl<T: DhtPin + ?Sized> DhtPin for &mut T {
    type Error = T::Error;

    fn set_output(&mut self, level: PinState) -> Result<(), Self::Error> {
        T::set_output(self, level)
    }

    fn set_input(&mut self) -> Result<(), Self::Error> {
        T::set_input(self)
    }

    fn read_level(&mut self) -> Result<PinState, Self::Error> {
        T::read_level(self)
    }

    fn wait_for_edge(&mut self, timeout_us: u32) -> Result<bool, Self::Error> {
        T::wait_for_edge(self, timeout_us)
    }
}

/// [`DhtPin`] over an open-drain embedded-hal pin and a delay provider.
///
/// Edge waits are emulated by sampling the line once per microsecond, so the
/// effective resolution depends on how fast the HAL reads the pin.
pub struct PolledPin<PIN, D> {
    pin: PIN,
    delay: D,
    /// Last sampled level, `true` for high. Edges are measured against it so
    /// a change between `read_level` and `wait_for_edge` is not lost.
    last_level: Option<bool>,
}

impl<PIN, D, E> PolledPin<PIN, D>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayNs,
    E: Debug,
{
    /// # Arguments
    ///
    /// * `pin` - The GPIO pin connected to the data line, configured as open-drain.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(pin: PIN, delay: D) -> Self {
        PolledPin {
            pin,
            delay,
            last_level: None,
        }
    }

    /// Returns the wrapped pin and delay.
    pub fn free(self) -> (PIN, D) {
        (self.pin, self.delay)
    }
}

impl<PIN, D, E> DhtPin for PolledPin<PIN, D>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayNs,
    E: Debug,
{
    type Error = E;

    fn set_output(&mut self, level: PinState) -> Result<(), E> {
        self.last_level = None;
        self.pin.set_state(level)
    }

    fn set_input(&mut self) -> Result<(), E> {
        self.last_level = None;
        // Releasing an open-drain line lets the pull-up hold it high.
        self.pin.set_high()
    }

    fn read_level(&mut self) -> Result<PinState, E> {
        let high = self.pin.is_high()?;
        self.last_level = Some(high);
        Ok(PinState::from(high))
    }

    fn wait_for_edge(&mut self, timeout_us: u32) -> Result<bool, E> {
        let sample = self.pin.is_high()?;
        let reference = self.last_level.unwrap_or(sample);
        self.last_level = Some(sample);
        if sample != reference {
            return Ok(true);
        }

        for _ in 0..timeout_us {
            self.delay.delay_us(1);
            let high = self.pin.is_high()?;
            self.last_level = Some(high);
            if high != reference {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
