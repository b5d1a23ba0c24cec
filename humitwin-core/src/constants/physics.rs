//! Physical Constants for HumiTwin
//!
//! Fundamental constants and empirical coefficients used by the psychrometric
//! converter and the capacitive sensor model.

// ===== FUNDAMENTAL PHYSICS CONSTANTS =====

/// Offset between Celsius and Kelvin (K).
///
/// Source: NIST Special Publication 330 (2019)
pub const KELVIN_OFFSET: f64 = 273.15;

/// Vacuum permittivity ε₀ (F/m).
///
/// Scales the relative permittivity of the sensor dielectric into an
/// absolute capacitance.
///
/// Source: CODATA 2018 (8.8541878128e-12, rounded)
pub const VACUUM_PERMITTIVITY_F_PER_M: f64 = 8.854e-12;

/// Specific gas constant of water vapor Rv (J/(kg·K)).
///
/// Links vapor partial pressure to vapor density through the ideal gas law:
/// p_v = ρ_v · Rv · T.
///
/// Source: WMO Guide to Meteorological Instruments, Annex 4.B
pub const WATER_VAPOR_GAS_CONSTANT_J_PER_KG_K: f64 = 461.5;

/// Standard atmospheric pressure at sea level (Pa).
///
/// Total pressure assumed by the enthalpy calculation. The model does not
/// correct for altitude or weather.
///
/// Source: International Standard Atmosphere (ISA)
pub const STANDARD_PRESSURE_PA: f64 = 101_325.0;

// ===== MAGNUS FORMULA =====

/// Saturation vapor pressure at 0°C (Pa).
///
/// Source: Sonntag (1990), Magnus coefficients over water
pub const MAGNUS_BASE_PRESSURE_PA: f64 = 611.2;

/// Magnus coefficient β (dimensionless).
pub const MAGNUS_BETA: f64 = 17.62;

/// Magnus coefficient λ (°C).
pub const MAGNUS_LAMBDA_C: f64 = 243.12;

// ===== MOIST AIR =====

/// Ratio of molar masses of water vapor and dry air (18.015 / 28.964).
///
/// Converts vapor partial pressure into a humidity ratio (kg water / kg dry air).
pub const MOLAR_MASS_RATIO: f64 = 0.622;

/// Specific heat of dry air at constant pressure (kJ/(kg·K)).
///
/// Source: ASHRAE Handbook Fundamentals, Chapter 1
pub const DRY_AIR_SPECIFIC_HEAT_KJ_PER_KG_K: f64 = 1.006;

/// Latent heat of vaporization of water at 0°C (kJ/kg).
///
/// Source: ASHRAE Handbook Fundamentals, Chapter 1
pub const WATER_LATENT_HEAT_KJ_PER_KG: f64 = 2501.0;

/// Specific heat of water vapor at constant pressure (kJ/(kg·K)).
///
/// Source: ASHRAE Handbook Fundamentals, Chapter 1
pub const WATER_VAPOR_SPECIFIC_HEAT_KJ_PER_KG_K: f64 = 1.86;

// ===== ENVIRONMENTAL LIMITS =====

/// Lowest plausible ambient temperature (°C).
///
/// Coldest natural temperature recorded on Earth is -89.2°C; the Magnus fit
/// degrades well before that, so samples below this are rejected.
///
/// Source: World Meteorological Organization
pub const AMBIENT_TEMP_MIN_C: f64 = -80.0;

/// Highest plausible ambient temperature (°C).
///
/// Source: World Meteorological Organization (54.4°C, Death Valley)
pub const AMBIENT_TEMP_MAX_C: f64 = 60.0;
