//! Drifting Humidity Twin
//!
//! The comparison pipeline without any physics: a "true" humidity wanders
//! in a bounded random walk and the measured value is the true value plus a
//! flat error within the sensor accuracy. It shares only the update cadence
//! with the capacitive model.
//!
//! ```text
//! true     ← clamp(true + U(±0.5 %RH/s) · dt, min, max)
//! measured ← clamp(true + U(±accuracy), min, max)
//! ```
//!
//! Updates run at a fixed 30 Hz. [`DriftingHumidityTwin::advance`] takes
//! arbitrary elapsed time (a frame, a timer tick) and runs as many whole
//! updates as fit, carrying the remainder to the next call.

use crate::{
    constants::{
        sensors::{
            HUMIDITY_ACCURACY_PCT, HUMIDITY_MAX_DRIFT_PCT_PER_S, HUMIDITY_SENSOR_MAX_PCT,
            HUMIDITY_SENSOR_MIN_PCT,
        },
        time::SENSOR_UPDATE_INTERVAL_S,
    },
    errors::{TwinError, TwinResult},
    noise::NoiseSource,
};

/// Range and accuracy of the simulated sensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HumiditySpec {
    /// Lowest reportable RH (%)
    pub min_pct: f64,
    /// Highest reportable RH (%)
    pub max_pct: f64,
    /// Flat measurement error bound (±%RH)
    pub accuracy_pct: f64,
    /// Maximum drift of the true value (%RH/s)
    pub max_drift_pct_per_s: f64,
}

impl Default for HumiditySpec {
    fn default() -> Self {
        Self {
            min_pct: HUMIDITY_SENSOR_MIN_PCT,
            max_pct: HUMIDITY_SENSOR_MAX_PCT,
            accuracy_pct: HUMIDITY_ACCURACY_PCT,
            max_drift_pct_per_s: HUMIDITY_MAX_DRIFT_PCT_PER_S,
        }
    }
}

impl HumiditySpec {
    /// Checked spec: finite values, `min_pct <= max_pct`, non-negative rates
    pub fn new(
        min_pct: f64,
        max_pct: f64,
        accuracy_pct: f64,
        max_drift_pct_per_s: f64,
    ) -> TwinResult<Self> {
        let spec = Self {
            min_pct,
            max_pct,
            accuracy_pct,
            max_drift_pct_per_s,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check a spec built from its public fields
    pub fn validate(&self) -> TwinResult<()> {
        let values = [self.min_pct, self.max_pct, self.accuracy_pct, self.max_drift_pct_per_s];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(TwinError::InvalidValue);
        }
        if self.min_pct > self.max_pct {
            return Err(TwinError::InputOutOfRange {
                quantity: "minimum humidity",
                value: self.min_pct,
                min: f64::NEG_INFINITY,
                max: self.max_pct,
            });
        }
        if self.accuracy_pct < 0.0 {
            return Err(TwinError::InputOutOfRange {
                quantity: "accuracy",
                value: self.accuracy_pct,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        if self.max_drift_pct_per_s < 0.0 {
            return Err(TwinError::InputOutOfRange {
                quantity: "drift rate",
                value: self.max_drift_pct_per_s,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        Ok(())
    }

    /// Middle of the measurement range
    pub fn midpoint(&self) -> f64 {
        (self.min_pct + self.max_pct) / 2.0
    }

    // `f64::clamp` panics on inverted bounds; this settles on `max_pct`
    fn clamp(&self, value: f64) -> f64 {
        value.max(self.min_pct).min(self.max_pct)
    }
}

/// Random-walk humidity twin with flat measurement error
#[derive(Debug, Clone)]
pub struct DriftingHumidityTwin<N> {
    spec: HumiditySpec,
    noise: N,
    update_interval_s: f64,
    accumulated_s: f64,
    true_humidity_pct: f64,
    measured_humidity_pct: f64,
    external_humidity_pct: Option<f64>,
}

impl<N: NoiseSource> DriftingHumidityTwin<N> {
    /// Twin with the default spec, starting mid-range
    pub fn new(noise: N) -> Self {
        Self::with_spec(HumiditySpec::default(), noise)
    }

    /// Twin with a custom spec, starting mid-range
    pub fn with_spec(spec: HumiditySpec, noise: N) -> Self {
        let start = spec.midpoint();
        Self {
            spec,
            noise,
            update_interval_s: SENSOR_UPDATE_INTERVAL_S,
            accumulated_s: 0.0,
            true_humidity_pct: start,
            measured_humidity_pct: start,
            external_humidity_pct: None,
        }
    }

    /// Override the fixed update interval (seconds)
    pub fn with_update_interval(mut self, interval_s: f64) -> Self {
        if interval_s > 0.0 {
            self.update_interval_s = interval_s;
        }
        self
    }

    /// Run one update covering `dt_s` seconds
    ///
    /// Negative or non-finite `dt_s` is ignored.
    pub fn step(&mut self, dt_s: f64) {
        if !dt_s.is_finite() || dt_s < 0.0 {
            return;
        }

        let drift = self.noise.uniform(self.spec.max_drift_pct_per_s) * dt_s;
        self.true_humidity_pct = self.spec.clamp(self.true_humidity_pct + drift);

        let error = self.noise.uniform(self.spec.accuracy_pct);
        self.measured_humidity_pct = self.spec.clamp(self.true_humidity_pct + error);
    }

    /// Account for `elapsed_s` seconds, running whole fixed-interval updates
    ///
    /// Returns the number of updates run.
    pub fn advance(&mut self, elapsed_s: f64) -> u32 {
        if !elapsed_s.is_finite() || elapsed_s <= 0.0 {
            return 0;
        }

        self.accumulated_s += elapsed_s;
        let mut steps = 0;
        while self.accumulated_s >= self.update_interval_s {
            self.step(self.update_interval_s);
            self.accumulated_s -= self.update_interval_s;
            steps += 1;
        }
        steps
    }

    /// Record the latest humidity from the external feed (%)
    pub fn set_external_humidity(&mut self, rh_pct: f64) {
        self.external_humidity_pct = Some(rh_pct);
    }

    /// Current true humidity (%)
    pub fn true_humidity(&self) -> f64 {
        self.true_humidity_pct
    }

    /// Current measured humidity (%)
    pub fn measured_humidity(&self) -> f64 {
        self.measured_humidity_pct
    }

    /// Latest external humidity, if the feed ever answered (%)
    pub fn external_humidity(&self) -> Option<f64> {
        self.external_humidity_pct
    }

    /// Sensor spec in use
    pub fn spec(&self) -> &HumiditySpec {
        &self.spec
    }
}
