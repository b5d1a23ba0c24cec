//! Error Types for the Simulation Core
//!
//! ## Design Philosophy
//!
//! The core never panics and never lets NaN or infinity escape into a
//! reading. Anything the formulas cannot answer is reported as a typed error
//! so the reporting side can react differently from a normal reading.
//!
//! Errors are small and `Copy`: no `String`, only `&'static str` labels, so
//! they can be returned from `no_std` builds and stored next to readings.
//!
//! ## Error Categories
//!
//! ### Input Violations
//! - `InputOutOfRange`: ambient sample outside plausible physical bounds
//! - `InvalidValue`: NaN or infinite input
//!
//! ### Model Singularities
//! - `Singularity`: formula undefined for the given state (dew point at 0% RH)
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use humitwin_core::{CapacitiveSensor, FixedNoise, TwinError};
//!
//! let mut sensor = CapacitiveSensor::new(FixedNoise::new(0.0));
//!
//! match sensor.simulate(8.65, 20.0) {
//!     Ok(reading) => {
//!         // Forward to the reporting sink
//!         let _ = reading.rh_pct;
//!     }
//!     Err(TwinError::Singularity { .. }) => {
//!         // Sensor reads bone dry - dew point undefined
//!     }
//!     Err(_) => {
//!         // Bad input - drop the sample
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for simulation operations
pub type TwinResult<T> = Result<T, TwinError>;

/// Simulation errors - kept small and `Copy`
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TwinError {
    /// Input outside physically plausible bounds
    #[error("{quantity} {value} outside range [{min}, {max}]")]
    InputOutOfRange {
        /// Name of the offending quantity ("temperature", "relative humidity")
        quantity: &'static str,
        /// The value that failed the check
        value: f64,
        /// Lowest accepted value
        min: f64,
        /// Highest accepted value
        max: f64,
    },

    /// Formula undefined for the requested state
    #[error("Singularity: {reason}")]
    Singularity {
        /// What diverged
        reason: &'static str,
    },

    /// Value makes no physical sense (NaN, infinity)
    #[error("Invalid value: not a finite number")]
    InvalidValue,
}

impl TwinError {
    /// True when the error comes from the model rather than from its input
    pub fn is_singularity(&self) -> bool {
        matches!(self, Self::Singularity { .. })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TwinError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InputOutOfRange { quantity, value, min, max } =>
                defmt::write!(fmt, "{} {} outside [{}, {}]", quantity, value, min, max),
            Self::Singularity { reason } =>
                defmt::write!(fmt, "Singularity: {}", reason),
            Self::InvalidValue =>
                defmt::write!(fmt, "Invalid value"),
        }
    }
}
