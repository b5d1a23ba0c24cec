//! Capacitive Humidity Sensor Model
//!
//! ## Physics Background
//!
//! A capacitive humidity sensor is a parallel-plate capacitor whose
//! dielectric is a thin hygroscopic polymer. The polymer absorbs water in
//! proportion to the relative humidity around it, and absorbed water raises
//! its permittivity:
//!
//! ```text
//! ε_r = ε_dry + (ε_wet − ε_dry) · RH / 100
//! C   = ε₀ · ε_r · A / d
//! ```
//!
//! With the H3431 geometry (A = 10 mm², d = 5 µm) that spans roughly
//! 70.8 pF (dry) to 141.7 pF (saturated).
//!
//! ### Non-Ideal Behavior
//!
//! Two effects separate the reading from the true humidity:
//!
//! - **Noise**: each reading is scaled by a uniform error of up to
//!   ±2.5% of the value.
//! - **Hysteresis**: the polymer absorbs faster than it releases. A reading
//!   above the previous one overshoots by +1 %RH, anything else undershoots
//!   by 1 %RH.
//!
//! The hysteresis history is recorded *before* clamping to [0, 100], so the
//! stored value can sit outside the range while every reported RH is inside.
//!
//! ### Derived Quantities
//!
//! - Dew point is computed from the *reported* RH: it is what the sensor
//!   perceives.
//! - Enthalpy is computed from the *input* absolute humidity: it describes
//!   the air, not the sensor.
//!
//! ## Usage
//!
//! ```rust
//! use humitwin_core::{CapacitiveSensor, FixedNoise, psychrometrics};
//!
//! let mut sensor = CapacitiveSensor::new(FixedNoise::zero());
//! let rho = psychrometrics::absolute_humidity(50.0, 20.0);
//!
//! // First reading rises from the 0% history: +1 %RH
//! let reading = sensor.simulate(rho, 20.0)?;
//! assert!((reading.rh_pct - 51.0).abs() < 1e-9);
//! # Ok::<(), humitwin_core::TwinError>(())
//! ```

use crate::{
    constants::{
        physics::{
            KELVIN_OFFSET, VACUUM_PERMITTIVITY_F_PER_M, WATER_VAPOR_GAS_CONSTANT_J_PER_KG_K,
        },
        sensors::{
            DIELECTRIC_THICKNESS_M, HUMIDITY_ACCURACY_PCT, HUMIDITY_SENSOR_MAX_PCT,
            HUMIDITY_SENSOR_MIN_PCT, HYSTERESIS_STEP_PCT, PERMITTIVITY_DRY, PERMITTIVITY_WET,
            PLATE_AREA_M2,
        },
    },
    errors::{TwinError, TwinResult},
    noise::NoiseSource,
    psychrometrics,
};

/// Fixed physical parameters of one sensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorConstants {
    /// Vacuum permittivity ε₀ (F/m)
    pub vacuum_permittivity_f_per_m: f64,
    /// Water vapor gas constant Rv (J/(kg·K))
    pub water_vapor_gas_constant: f64,
    /// Relative permittivity at 0% RH
    pub permittivity_dry: f64,
    /// Relative permittivity at 100% RH
    pub permittivity_wet: f64,
    /// Electrode area (m²)
    pub plate_area_m2: f64,
    /// Dielectric thickness (m)
    pub thickness_m: f64,
    /// Multiplicative noise bound (±% of reading)
    pub noise_bound_pct: f64,
    /// Hysteresis step (±%RH)
    pub hysteresis_step_pct: f64,
}

impl Default for SensorConstants {
    fn default() -> Self {
        Self::h3431()
    }
}

impl SensorConstants {
    /// H3431 datasheet values
    pub const fn h3431() -> Self {
        Self {
            vacuum_permittivity_f_per_m: VACUUM_PERMITTIVITY_F_PER_M,
            water_vapor_gas_constant: WATER_VAPOR_GAS_CONSTANT_J_PER_KG_K,
            permittivity_dry: PERMITTIVITY_DRY,
            permittivity_wet: PERMITTIVITY_WET,
            plate_area_m2: PLATE_AREA_M2,
            thickness_m: DIELECTRIC_THICKNESS_M,
            noise_bound_pct: HUMIDITY_ACCURACY_PCT,
            hysteresis_step_pct: HYSTERESIS_STEP_PCT,
        }
    }

    /// Ideal sensor: no noise, no hysteresis
    pub const fn ideal() -> Self {
        Self::h3431().with_noise_bound(0.0).with_hysteresis_step(0.0)
    }

    /// Set the noise bound (±% of reading)
    pub const fn with_noise_bound(mut self, bound_pct: f64) -> Self {
        self.noise_bound_pct = bound_pct;
        self
    }

    /// Set the hysteresis step (±%RH)
    pub const fn with_hysteresis_step(mut self, step_pct: f64) -> Self {
        self.hysteresis_step_pct = step_pct;
        self
    }

    /// Set electrode area (m²) and dielectric thickness (m)
    pub const fn with_geometry(mut self, plate_area_m2: f64, thickness_m: f64) -> Self {
        self.plate_area_m2 = plate_area_m2;
        self.thickness_m = thickness_m;
        self
    }

    /// Set dry and wet relative permittivity
    pub const fn with_permittivity(mut self, dry: f64, wet: f64) -> Self {
        self.permittivity_dry = dry;
        self.permittivity_wet = wet;
        self
    }

    /// Relative permittivity of the dielectric at `rh_pct`
    pub fn permittivity(&self, rh_pct: f64) -> f64 {
        self.permittivity_dry + (self.permittivity_wet - self.permittivity_dry) * (rh_pct / 100.0)
    }

    /// Capacitance (F) at `rh_pct`
    pub fn capacitance(&self, rh_pct: f64) -> f64 {
        self.vacuum_permittivity_f_per_m * self.permittivity(rh_pct) * self.geometry_factor()
    }

    /// Capacitance (F) at 0% and 100% RH
    pub fn capacitance_bounds(&self) -> (f64, f64) {
        (
            self.capacitance(HUMIDITY_SENSOR_MIN_PCT),
            self.capacitance(HUMIDITY_SENSOR_MAX_PCT),
        )
    }

    /// A / d (m)
    fn geometry_factor(&self) -> f64 {
        self.plate_area_m2 / self.thickness_m
    }

    /// Theoretical RH (%) the sensor sees for an absolute humidity
    fn relative_humidity(&self, abs_humidity_g_m3: f64, temp_c: f64) -> f64 {
        psychrometrics::relative_humidity_at_vapor_pressure(
            self.vapor_pressure(abs_humidity_g_m3, temp_c),
            temp_c,
        )
    }

    fn vapor_pressure(&self, abs_humidity_g_m3: f64, temp_c: f64) -> f64 {
        (abs_humidity_g_m3 / 1000.0) * self.water_vapor_gas_constant * (temp_c + KELVIN_OFFSET)
    }
}

/// Hysteresis memory of one sensor
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorState {
    /// Last modeled RH before clamping (%)
    pub last_modeled_rh_pct: f64,
}

/// One simulated sensor reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResult {
    /// Reported relative humidity, always in [0, 100] (%)
    pub rh_pct: f64,
    /// Sensor capacitance (F)
    pub capacitance_f: f64,
    /// Dew point from the reported RH (°C)
    pub dew_point_c: f64,
    /// Specific enthalpy from the input absolute humidity (kJ/kg dry air)
    pub enthalpy_kj_per_kg: f64,
}

/// Advance the sensor model by one reading
///
/// `noise_pct` is the already drawn measurement error in percent of the
/// reading. Returns the new state together with the reading; the state
/// advances even when the reading fails with a dew point singularity.
/// Non-finite input leaves the state untouched.
pub fn simulate_step(
    constants: &SensorConstants,
    state: SensorState,
    noise_pct: f64,
    abs_humidity_g_m3: f64,
    temp_c: f64,
) -> (SensorState, TwinResult<SimulationResult>) {
    if !abs_humidity_g_m3.is_finite() || !temp_c.is_finite() || !noise_pct.is_finite() {
        return (state, Err(TwinError::InvalidValue));
    }

    let theoretical_rh = constants.relative_humidity(abs_humidity_g_m3, temp_c);
    let noisy_rh = theoretical_rh * (1.0 + noise_pct / 100.0);

    let modeled_rh = if noisy_rh > state.last_modeled_rh_pct {
        noisy_rh + constants.hysteresis_step_pct
    } else {
        noisy_rh - constants.hysteresis_step_pct
    };
    let next = SensorState {
        last_modeled_rh_pct: modeled_rh,
    };

    let rh_pct = modeled_rh.clamp(HUMIDITY_SENSOR_MIN_PCT, HUMIDITY_SENSOR_MAX_PCT);
    if rh_pct != modeled_rh {
        log_debug!("Modeled RH {} clamped to {}", modeled_rh, rh_pct);
    }

    let dew_point_c = match psychrometrics::dew_point(temp_c, rh_pct) {
        Ok(dew_point) => dew_point,
        Err(e) => {
            log_warn!("Dew point unavailable at RH {}: {:?}", rh_pct, e);
            return (next, Err(e));
        }
    };

    let enthalpy_kj_per_kg = psychrometrics::specific_enthalpy_at_vapor_pressure(
        temp_c,
        constants.vapor_pressure(abs_humidity_g_m3, temp_c),
    );

    let result = SimulationResult {
        rh_pct,
        capacitance_f: constants.capacitance(rh_pct),
        dew_point_c,
        enthalpy_kj_per_kg,
    };

    (next, Ok(result))
}

/// Stateful digital twin of one capacitive humidity sensor
///
/// Owns its hysteresis state and its noise source. Calls must be serialized;
/// run one instance per simulated sensor.
#[derive(Debug, Clone)]
pub struct CapacitiveSensor<N> {
    constants: SensorConstants,
    state: SensorState,
    noise: N,
}

impl<N: NoiseSource> CapacitiveSensor<N> {
    /// H3431 sensor with the given noise source
    pub fn new(noise: N) -> Self {
        Self::with_constants(SensorConstants::default(), noise)
    }

    /// Sensor with custom constants
    pub fn with_constants(constants: SensorConstants, noise: N) -> Self {
        Self {
            constants,
            state: SensorState::default(),
            noise,
        }
    }

    /// Start from a known hysteresis state
    pub fn with_state(mut self, state: SensorState) -> Self {
        self.state = state;
        self
    }

    /// Simulate one reading for absolute humidity (g/m³) and temperature (°C)
    pub fn simulate(
        &mut self,
        abs_humidity_g_m3: f64,
        temp_c: f64,
    ) -> TwinResult<SimulationResult> {
        let noise_pct = self.noise.uniform(self.constants.noise_bound_pct);
        let (next, result) =
            simulate_step(&self.constants, self.state, noise_pct, abs_humidity_g_m3, temp_c);
        self.state = next;
        result
    }

    /// Current hysteresis state
    pub fn state(&self) -> SensorState {
        self.state
    }

    /// Physical constants of this sensor
    pub fn constants(&self) -> &SensorConstants {
        &self.constants
    }

    /// Forget the hysteresis history
    pub fn reset(&mut self) {
        self.state = SensorState::default();
    }
}
