//! Psychrometric Conversions for Moist Air
//!
//! ## Physics Background
//!
//! ### Saturation Vapor Pressure
//!
//! Air at a given temperature can hold only so much water vapor. The partial
//! pressure at which vapor starts to condense is the saturation vapor
//! pressure, approximated by the Magnus formula:
//!
//! ```text
//! e_s(T) = 611.2 · exp(17.62·T / (243.12 + T))     [Pa, T in °C]
//! ```
//!
//! The fit is good from about -40°C to +50°C. Outside that range the
//! functions below still answer, they just extrapolate.
//!
//! ### Relative vs Absolute Humidity
//!
//! ```text
//! p_v = (RH / 100) · e_s(T)                 vapor partial pressure [Pa]
//! ρ_v = 1000 · p_v / (Rv · (T + 273.15))    absolute humidity [g/m³]
//! ```
//!
//! The inverse recovers RH from ρ_v and T. Neither direction clamps: an RH
//! above 100% maps to a supersaturated density and back.
//!
//! ### Dew Point
//!
//! Inverting Magnus for the temperature at which the current vapor pressure
//! saturates:
//!
//! ```text
//! γ  = ln(RH / 100) + 17.62·T / (243.12 + T)
//! Td = 243.12·γ / (17.62 − γ)
//! ```
//!
//! At RH = 0 the logarithm diverges. [`dew_point`] reports that as
//! [`TwinError::Singularity`] instead of returning -∞.
//!
//! ### Specific Enthalpy
//!
//! Heat content per kilogram of dry air, sensible plus latent:
//!
//! ```text
//! x = 0.622 · p_v / (101325 − p_v)          humidity ratio [kg/kg]
//! h = 1.006·T + x·(2501 + 1.86·T)           [kJ/kg dry air]
//! ```
//!
//! Total pressure is fixed at sea level.
//!
//! ## Usage
//!
//! ```rust
//! use humitwin_core::psychrometrics::{absolute_humidity, relative_humidity};
//!
//! let rho = absolute_humidity(50.0, 20.0);      // ≈ 8.62 g/m³
//! let rh = relative_humidity(rho, 20.0);        // back to 50%
//! assert!((rh - 50.0).abs() < 1e-9);
//! ```

use crate::{
    constants::physics::{
        DRY_AIR_SPECIFIC_HEAT_KJ_PER_KG_K, KELVIN_OFFSET, MAGNUS_BASE_PRESSURE_PA, MAGNUS_BETA,
        MAGNUS_LAMBDA_C, MOLAR_MASS_RATIO, STANDARD_PRESSURE_PA, WATER_LATENT_HEAT_KJ_PER_KG,
        WATER_VAPOR_GAS_CONSTANT_J_PER_KG_K, WATER_VAPOR_SPECIFIC_HEAT_KJ_PER_KG_K,
    },
    errors::{TwinError, TwinResult},
};

/// Saturation vapor pressure over water (Pa)
pub fn saturation_vapor_pressure(temp_c: f64) -> f64 {
    MAGNUS_BASE_PRESSURE_PA * libm::exp(magnus_exponent(temp_c))
}

/// Vapor partial pressure (Pa) implied by an absolute humidity at `temp_c`
pub fn vapor_pressure(abs_humidity_g_m3: f64, temp_c: f64) -> f64 {
    (abs_humidity_g_m3 / 1000.0) * WATER_VAPOR_GAS_CONSTANT_J_PER_KG_K * (temp_c + KELVIN_OFFSET)
}

/// Absolute humidity (g/m³) from relative humidity (%) and temperature (°C)
///
/// RH is expected in [0, 100] but not checked. Validate at the boundary with
/// [`AmbientSample::validated`](crate::AmbientSample::validated).
pub fn absolute_humidity(rh_pct: f64, temp_c: f64) -> f64 {
    let p_v = (rh_pct / 100.0) * saturation_vapor_pressure(temp_c);
    1000.0 * p_v / (WATER_VAPOR_GAS_CONSTANT_J_PER_KG_K * (temp_c + KELVIN_OFFSET))
}

/// Relative humidity (%) from absolute humidity (g/m³) and temperature (°C)
///
/// Not clamped: inconsistent inputs may give values above 100 or below 0.
pub fn relative_humidity(abs_humidity_g_m3: f64, temp_c: f64) -> f64 {
    relative_humidity_at_vapor_pressure(vapor_pressure(abs_humidity_g_m3, temp_c), temp_c)
}

/// Relative humidity (%) for a vapor partial pressure (Pa) at `temp_c`
pub fn relative_humidity_at_vapor_pressure(vapor_pressure_pa: f64, temp_c: f64) -> f64 {
    100.0 * vapor_pressure_pa / saturation_vapor_pressure(temp_c)
}

/// Dew point (°C) from temperature (°C) and relative humidity (%)
///
/// Fails with [`TwinError::Singularity`] for RH ≤ 0 and with
/// [`TwinError::InvalidValue`] for non-finite input.
pub fn dew_point(temp_c: f64, rh_pct: f64) -> TwinResult<f64> {
    if !temp_c.is_finite() || !rh_pct.is_finite() {
        return Err(TwinError::InvalidValue);
    }
    if rh_pct <= 0.0 {
        return Err(TwinError::Singularity {
            reason: "dew point undefined at 0% RH",
        });
    }

    let gamma = libm::log(rh_pct / 100.0) + magnus_exponent(temp_c);
    let dew_point = MAGNUS_LAMBDA_C * gamma / (MAGNUS_BETA - gamma);

    if dew_point.is_finite() {
        Ok(dew_point)
    } else {
        Err(TwinError::Singularity {
            reason: "dew point diverges",
        })
    }
}

/// Humidity ratio x (kg water / kg dry air) at sea-level pressure
pub fn humidity_ratio(abs_humidity_g_m3: f64, temp_c: f64) -> f64 {
    humidity_ratio_at_vapor_pressure(vapor_pressure(abs_humidity_g_m3, temp_c))
}

fn humidity_ratio_at_vapor_pressure(p_v: f64) -> f64 {
    MOLAR_MASS_RATIO * p_v / (STANDARD_PRESSURE_PA - p_v)
}

/// Specific enthalpy (kJ/kg dry air) from temperature (°C) and absolute humidity (g/m³)
pub fn specific_enthalpy(temp_c: f64, abs_humidity_g_m3: f64) -> f64 {
    specific_enthalpy_at_vapor_pressure(temp_c, vapor_pressure(abs_humidity_g_m3, temp_c))
}

/// Specific enthalpy (kJ/kg dry air) for a vapor partial pressure (Pa) at `temp_c`
pub fn specific_enthalpy_at_vapor_pressure(temp_c: f64, vapor_pressure_pa: f64) -> f64 {
    let x = humidity_ratio_at_vapor_pressure(vapor_pressure_pa);
    DRY_AIR_SPECIFIC_HEAT_KJ_PER_KG_K * temp_c
        + x * (WATER_LATENT_HEAT_KJ_PER_KG + WATER_VAPOR_SPECIFIC_HEAT_KJ_PER_KG_K * temp_c)
}

#[inline]
fn magnus_exponent(temp_c: f64) -> f64 {
    MAGNUS_BETA * temp_c / (MAGNUS_LAMBDA_C + temp_c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation_pressure_at_freezing() {
        assert!((saturation_vapor_pressure(0.0) - 611.2).abs() < 1e-9);
    }

    #[test]
    fn saturation_pressure_at_room_temperature() {
        // ≈ 2.33 kPa at 20°C
        assert!((saturation_vapor_pressure(20.0) - 2332.6).abs() < 0.5);
    }

    #[test]
    fn absolute_humidity_reference_point() {
        let rho = absolute_humidity(50.0, 20.0);
        assert!((rho - 8.65).abs() < 0.05, "got {}", rho);
    }

    #[test]
    fn absolute_humidity_extrapolates() {
        // No clamping: 120% scales linearly
        let at_100 = absolute_humidity(100.0, 20.0);
        let at_120 = absolute_humidity(120.0, 20.0);
        assert!((at_120 / at_100 - 1.2).abs() < 1e-12);
        assert!(absolute_humidity(-10.0, 20.0) < 0.0);
    }

    #[test]
    fn relative_humidity_inverts_absolute() {
        let rh = relative_humidity(absolute_humidity(50.0, 20.0), 20.0);
        assert!((rh - 50.0).abs() < 1e-9);
    }

    #[test]
    fn dew_point_reference_point() {
        let td = dew_point(25.0, 60.0).unwrap();
        assert!((td - 16.7).abs() < 0.2, "got {}", td);
    }

    #[test]
    fn dew_point_equals_temperature_at_saturation() {
        let td = dew_point(20.0, 100.0).unwrap();
        assert!((td - 20.0).abs() < 1e-9);
    }

    #[test]
    fn dew_point_at_zero_humidity_is_singular() {
        assert!(matches!(dew_point(20.0, 0.0), Err(TwinError::Singularity { .. })));
        assert!(matches!(dew_point(20.0, -5.0), Err(TwinError::Singularity { .. })));
    }

    #[test]
    fn dew_point_rejects_nan() {
        assert_eq!(dew_point(f64::NAN, 50.0), Err(TwinError::InvalidValue));
        assert_eq!(dew_point(20.0, f64::INFINITY), Err(TwinError::InvalidValue));
    }

    #[test]
    fn enthalpy_of_room_air() {
        // x ≈ 0.00727 kg/kg at 20°C, 8.65 g/m³
        let x = humidity_ratio(8.65, 20.0);
        assert!((x - 0.00727).abs() < 1e-4, "got {}", x);

        let h = specific_enthalpy(20.0, 8.65);
        assert!((h - 38.57).abs() < 0.5, "got {}", h);
    }

    #[test]
    fn enthalpy_of_dry_air_is_sensible_heat_only() {
        let h = specific_enthalpy(20.0, 0.0);
        assert!((h - 20.12).abs() < 1e-9);
    }
}
