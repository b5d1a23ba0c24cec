//! Physical model for the HumiTwin capacitive humidity sensor
//!
//! Turns ambient readings (temperature, relative humidity) into the output a
//! real capacitive sensor would produce: measurement noise, directional
//! hysteresis, dielectric capacitance and the derived psychrometric values.
//!
//! Key constraints:
//! - Pure computation, no I/O (feeds and sinks live in `humitwin-connectors`)
//! - Builds without `std` (math through `libm`)
//! - Randomness is injected, never global
//!
//! ```no_run
//! use humitwin_core::{AmbientSample, CapacitiveSensor, RngNoise};
//!
//! let mut sensor = CapacitiveSensor::new(RngNoise::seeded(7));
//! let sample = AmbientSample::validated(20.0, 50.0)?;
//!
//! match sensor.simulate(sample.absolute_humidity(), sample.temperature_c) {
//!     Ok(reading) => {}, // Report it
//!     Err(e) => {},      // Singular reading (RH clamped to 0)
//! }
//! # Ok::<(), humitwin_core::TwinError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Macros for optional logging
#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

pub mod constants;
pub mod drift;
pub mod errors;
pub mod noise;
pub mod psychrometrics;
pub mod sample;
pub mod sensor;

// Public API
pub use drift::{DriftingHumidityTwin, HumiditySpec};
pub use errors::{TwinError, TwinResult};
pub use noise::{FixedNoise, NoiseSource, SequenceNoise};
#[cfg(feature = "rand")]
pub use noise::RngNoise;
pub use sample::AmbientSample;
pub use sensor::{
    simulate_step, CapacitiveSensor, SensorConstants, SensorState, SimulationResult,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
