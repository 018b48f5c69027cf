//! Phase budgets for the single-wire exchange.
//!
//! Nominal sensor timings (from the DHT11/DHT22 datasheets):
//! the host holds the line low for 1-20 ms, the sensor answers within
//! 20-40us with 80us low and 80us high, then every bit is 50us low followed
//! by ~24us high for a `0` or ~70us high for a `1`.

/// Timeouts used by the protocol decoder.
///
/// `bit_threshold_us` is empirical rather than a protocol guarantee.
/// Raise or lower it when calibrating against unusual hardware or a GPIO
/// backend with large edge latency.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// How long the host drives the line low to request a sample.
    pub start_hold_ms: u32,
    /// Time allowed for the sensor to pull the line low after release.
    pub response_timeout_us: u32,
    /// Time allowed for each half (high, then low) of the acknowledge.
    pub acknowledge_timeout_us: u32,
    /// Time allowed for the low gap before every data bit.
    pub bit_start_timeout_us: u32,
    /// Nominal maximum high time of a `1` bit.
    pub bit_one_high_us: u32,
    /// A high pulse that falls within this window is a `0`.
    pub bit_threshold_us: u32,
    /// Time allowed for the sensor to release the bus after the last bit.
    pub finish_timeout_us: u32,
}

impl Timings {
    pub const DEFAULT: Timings = Timings {
        start_hold_ms: 18,
        response_timeout_us: 40,
        acknowledge_timeout_us: 80,
        bit_start_timeout_us: 50,
        bit_one_high_us: 70,
        bit_threshold_us: 35,
        finish_timeout_us: 80,
    };

    /// Returns a copy with a different `0`/`1` classification threshold.
    pub const fn with_bit_threshold_us(mut self, threshold_us: u32) -> Self {
        self.bit_threshold_us = threshold_us;
        self
    }

    /// Time left for a `1` bit to fall once it outlived the threshold.
    pub const fn bit_one_remaining_us(&self) -> u32 {
        self.bit_one_high_us.saturating_sub(self.bit_threshold_us)
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::DEFAULT
    }
}
