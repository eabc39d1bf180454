//! DHT Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the DHT11 and DHT22
//! (AM2302) temperature and humidity sensors, built on top of the
//! [`embedded-hal`] traits.
//!
//! Both sensors speak the same single-wire protocol: the host sends a long
//! start pulse, the sensor acknowledges, then transmits 40 width-modulated
//! bits which the driver decodes by comparing pulse durations. The last
//! byte is a checksum over the first four. The two variants differ only in
//! how those bytes encode the values, selected via [`SensorKind`].
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access
//! - [`DelayNs`] for accurate timing
//!
//! The data line must be wired as an open-drain input/output with a pull-up,
//! so the caller supplies a single pin type implementing both pin traits.
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

pub mod dht;
pub mod error;

pub use dht::{Dht, Reading, SensorKind};
pub use error::DhtError;
