use core::fmt;

use crate::variant::SensorVariant;

/// Reading returned by the sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C {:.1}%", self.temperature, self.relative_humidity)
    }
}

/// The 5 bytes of one exchange: `[hum_hi, hum_lo, temp_hi, temp_lo, checksum]`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrame(pub [u8; 5]);

/// Checksum byte did not equal the wrapping sum of the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidChecksum {
    pub expected: u8,
    pub actual: u8,
}

/// Wrapping sum of the four payload bytes.
pub fn checksum(payload: &[u8; 4]) -> u8 {
    payload.iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
}

/// Returns true when byte 4 matches the checksum of bytes 0..4.
pub fn validate_checksum(raw: &[u8; 5]) -> bool {
    let [a, b, c, d, sum] = *raw;
    checksum(&[a, b, c, d]) == sum
}

impl RawFrame {
    /// Payload bytes without the checksum.
    pub fn payload(&self) -> [u8; 4] {
        let [a, b, c, d, _] = self.0;
        [a, b, c, d]
    }

    pub fn validate(&self) -> Result<(), InvalidChecksum> {
        if validate_checksum(&self.0) {
            Ok(())
        } else {
            Err(InvalidChecksum {
                expected: checksum(&self.payload()),
                actual: self.0[4],
            })
        }
    }

    /// Converts the frame into calibrated values for `variant`.
    ///
    /// Does not validate the checksum and never clamps: out-of-range
    /// humidity from a faulty sensor is returned as-is.
    pub fn decode(&self, variant: SensorVariant) -> Reading {
        decode(&self.0, variant)
    }
}

/// Converts the 5 raw bytes into a `Reading` for the given sensor variant.
pub fn decode(raw: &[u8; 5], variant: SensorVariant) -> Reading {
    let [hum_hi, hum_lo, temp_hi, temp_lo, _] = *raw;

    match variant {
        // The DHT11 fraction bytes carry no useful precision.
        SensorVariant::Dht11 => Reading {
            temperature: temp_hi as f32,
            relative_humidity: hum_hi as f32,
        },
        SensorVariant::Dht22 => {
            let joined_humidity = u16::from_be_bytes([hum_hi, hum_lo]);
            let relative_humidity = joined_humidity as f32 / 10.0;

            // Sign-magnitude, not two's complement.
            let is_temp_negative = (temp_hi >> 7) != 0;
            let joined_temp = u16::from_be_bytes([temp_hi & 0b0111_1111, temp_lo]);
            let mut temperature = joined_temp as f32 / 10.0;
            if is_temp_negative {
                temperature = -temperature;
            }

            Reading {
                temperature,
                relative_humidity,
            }
        }
    }
}
