use core::fmt::Debug;

/// Stage of the bus exchange that was active when a timeout occurred.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the sensor to answer the start request.
    Start,
    /// Waiting for the 80us high / 80us low acknowledge.
    Acknowledge,
    /// Receiving payload bit `bit` (0..40, first byte first, MSB first).
    Data { bit: u8 },
    /// Waiting for the sensor to release the bus.
    Finish,
}

/// Possible errors from a sensor read.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DhtError<E: Debug> {
    /// Timed out waiting for a pin state change.
    #[error("timed out waiting for the sensor during {0:?}")]
    Timeout(Phase),
    /// The exchange completed but the checksum did not match the data.
    #[error("invalid checksum: expected {expected:#04x}, received {actual:#04x}")]
    InvalidChecksum { expected: u8, actual: u8 },
    /// Error from the GPIO pin (input/output).
    #[error("pin error: {0:?}")]
    Pin(E),
    /// The wait for the next read slot was canceled.
    #[error("read canceled while waiting for the minimum read interval")]
    Canceled,
}

impl<E: Debug> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::Pin(value)
    }
}

/// Errors returned when constructing a driver.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError<E: Debug> {
    /// The configured sensor type is neither DHT11 nor DHT22.
    #[error("unsupported sensor variant")]
    UnsupportedVariant,
    /// The pin could not be driven to its idle high state.
    #[error("failed to drive pin high: {0:?}")]
    Pin(E),
}

impl<E: Debug> From<crate::variant::UnsupportedVariant> for ConstructionError<E> {
    fn from(_: crate::variant::UnsupportedVariant) -> Self {
        Self::UnsupportedVariant
    }
}
