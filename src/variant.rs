use core::{fmt, str::FromStr};

/// The sensor model attached to the data line.
///
/// Fixed for the lifetime of a driver. It selects the minimum read interval
/// and the byte layout used when decoding a frame.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SensorVariant {
    /// DHT11: whole-degree and whole-percent readings, one read per second.
    Dht11,
    /// DHT22 / AM2302: tenth-resolution readings, one read every two seconds.
    Dht22,
}

impl SensorVariant {
    /// Minimum time between the end of one exchange and the start of the next.
    pub const fn min_read_interval_us(self) -> u64 {
        match self {
            SensorVariant::Dht11 => 1_000_000,
            SensorVariant::Dht22 => 2_000_000,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SensorVariant::Dht11 => "DHT11",
            SensorVariant::Dht22 => "DHT22",
        }
    }
}

impl fmt::Display for SensorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a sensor type name is not one of the supported variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported sensor type, expected DHT11 or DHT22")]
pub struct UnsupportedVariant;

impl FromStr for SensorVariant {
    type Err = UnsupportedVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("dht11") {
            Ok(SensorVariant::Dht11)
        } else if s.eq_ignore_ascii_case("dht22") {
            Ok(SensorVariant::Dht22)
        } else {
            Err(UnsupportedVariant)
        }
    }
}
