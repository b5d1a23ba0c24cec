//! Ambient samples fed into the twin
//!
//! One sample is a (temperature, relative humidity) pair as delivered by the
//! weather feed. The converter functions accept anything; this is the place
//! where implausible input gets rejected.

use crate::{
    constants::{
        physics::{AMBIENT_TEMP_MAX_C, AMBIENT_TEMP_MIN_C},
        sensors::{HUMIDITY_SENSOR_MAX_PCT, HUMIDITY_SENSOR_MIN_PCT},
    },
    errors::{TwinError, TwinResult},
    psychrometrics,
};

/// Ambient reading from an external source
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmbientSample {
    /// Air temperature (°C)
    pub temperature_c: f64,
    /// Relative humidity (%)
    pub relative_humidity_pct: f64,
}

impl AmbientSample {
    /// Create a sample without checking it
    pub fn new(temperature_c: f64, relative_humidity_pct: f64) -> Self {
        Self {
            temperature_c,
            relative_humidity_pct,
        }
    }

    /// Create a sample, rejecting non-finite or physically implausible values
    pub fn validated(temperature_c: f64, relative_humidity_pct: f64) -> TwinResult<Self> {
        let sample = Self::new(temperature_c, relative_humidity_pct);
        sample.validate()?;
        Ok(sample)
    }

    /// Check the sample against plausible atmospheric bounds
    pub fn validate(&self) -> TwinResult<()> {
        if !self.temperature_c.is_finite() || !self.relative_humidity_pct.is_finite() {
            return Err(TwinError::InvalidValue);
        }

        check_range(
            "temperature",
            self.temperature_c,
            AMBIENT_TEMP_MIN_C,
            AMBIENT_TEMP_MAX_C,
        )?;
        check_range(
            "relative humidity",
            self.relative_humidity_pct,
            HUMIDITY_SENSOR_MIN_PCT,
            HUMIDITY_SENSOR_MAX_PCT,
        )
    }

    /// Absolute humidity (g/m³) of this sample
    pub fn absolute_humidity(&self) -> f64 {
        psychrometrics::absolute_humidity(self.relative_humidity_pct, self.temperature_c)
    }
}

fn check_range(quantity: &'static str, value: f64, min: f64, max: f64) -> TwinResult<()> {
    if value < min || value > max {
        Err(TwinError::InputOutOfRange {
            quantity,
            value,
            min,
            max,
        })
    } else {
        Ok(())
    }
}
