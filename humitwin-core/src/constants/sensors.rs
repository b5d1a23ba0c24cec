//! H3431 Sensor Specification
//!
//! Operational limits and geometry of the modelled capacitive humidity
//! sensor. The values describe one concrete part; everything here can be
//! overridden through [`SensorConstants`](crate::sensor::SensorConstants).

// ===== MEASUREMENT RANGE =====

/// Minimum measurable relative humidity (%).
///
/// Source: Physics (0% RH = no water vapor)
pub const HUMIDITY_SENSOR_MIN_PCT: f64 = 0.0;

/// Maximum measurable relative humidity (%).
///
/// Source: Physics (100% RH = saturated)
pub const HUMIDITY_SENSOR_MAX_PCT: f64 = 100.0;

/// Measurement error bound (±%RH).
///
/// Applied multiplicatively by the physical model and additively by the
/// drifting twin.
///
/// Source: H3431 datasheet
pub const HUMIDITY_ACCURACY_PCT: f64 = 2.5;

/// Hysteresis step (±%RH).
///
/// Added when humidity rises, subtracted when it falls.
///
/// Source: H3431 datasheet
pub const HYSTERESIS_STEP_PCT: f64 = 1.0;

/// Maximum drift of the true humidity in the drifting twin (%RH/s).
pub const HUMIDITY_MAX_DRIFT_PCT_PER_S: f64 = 0.5;

// ===== DIELECTRIC =====

/// Relative permittivity of the polymer at 0% RH.
///
/// Source: Typical polyimide film, dry
pub const PERMITTIVITY_DRY: f64 = 4.0;

/// Relative permittivity of the polymer at 100% RH.
///
/// Source: Typical polyimide film, saturated
pub const PERMITTIVITY_WET: f64 = 8.0;

// ===== GEOMETRY =====

/// Electrode plate area (m²), 10 mm².
pub const PLATE_AREA_M2: f64 = 10e-6;

/// Dielectric film thickness (m), 5 µm.
pub const DIELECTRIC_THICKNESS_M: f64 = 5e-6;
