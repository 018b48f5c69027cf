//! DHT11 / DHT22 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the DHT11 and DHT22
//! (AM2302) temperature and humidity sensors, which talk over a single
//! self-clocked data line.
//!
//! Bits are decoded by timing edges rather than by sampling at a fixed
//! delay: after the shared bit-start pulse, a line that falls within the
//! classification threshold (35us by default) is a `0`, a line still high
//! after it is a `1`.
//!
//! # Features
//! - Async `read` that enforces the sensor's minimum read interval and can be
//!   canceled while waiting for it
//! - Synchronous, tightly timed bus exchange
//! - Designed for `no_std` environments
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! The driver depends on:
//! - [`DhtPin`] for GPIO access, implemented by [`PolledPin`] for any
//!   [`InputPin`] + [`OutputPin`] open-drain pin
//! - [`DelayNs`] (blocking and async) for accurate timing
//! - [`Clock`] for the read interval
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support
//! - `critical-section`: Runs the timed part of the exchange inside a
//!   critical section
//! - `std`: Provides [`Clock`] over `std::time::Instant`
//!
//! # Example
//!
//! ```ignore
//! let pin = PolledPin::new(open_drain_pin, delay.clone());
//! let mut dht = Dht::new(pin, delay, clock, "DHT22".parse()?)?;
//! let reading = dht.read(core::future::pending()).await?;
//! ```
//!
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod dht;
pub mod error;
pub mod frame;
pub mod pin;
pub mod protocol;
pub mod throttle;
pub mod timing;
pub mod variant;

#[cfg(test)]
mod sim;

pub use dht::Dht;
pub use embedded_hal::digital::PinState;
pub use error::{ConstructionError, DhtError, Phase};
pub use frame::{RawFrame, Reading};
pub use pin::{DhtPin, PolledPin};
#[cfg(feature = "std")]
pub use throttle::SystemClock;
pub use throttle::{Canceled, Clock, Throttle};
pub use timing::Timings;
pub use variant::{SensorVariant, UnsupportedVariant};
