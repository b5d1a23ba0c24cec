//! Common test utilities for the simulation core
//!
//! Provides ambient scenarios and float assertions shared by the
//! integration suites.

#![allow(dead_code)]

use humitwin_core::AmbientSample;

/// Tolerance for round trips through the converter
pub const ROUND_TRIP_TOLERANCE: f64 = 1e-6;

/// Realistic outdoor temperature range covered by the Magnus fit (°C)
pub const TEMP_RANGE_C: core::ops::RangeInclusive<f64> = -40.0..=50.0;

/// Assert two floats are within `tolerance`
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}

/// Weather scenarios the twin is expected to handle
pub struct Scenarios;

impl Scenarios {
    /// Mild spring day
    pub fn temperate() -> AmbientSample {
        AmbientSample::new(20.0, 50.0)
    }

    /// Humid summer afternoon
    pub fn humid_summer() -> AmbientSample {
        AmbientSample::new(25.0, 60.0)
    }

    /// Continental winter morning
    pub fn winter_morning() -> AmbientSample {
        AmbientSample::new(-15.0, 85.0)
    }

    /// Fog: fully saturated air
    pub fn fog() -> AmbientSample {
        AmbientSample::new(8.0, 100.0)
    }

    /// Desert noon
    pub fn desert() -> AmbientSample {
        AmbientSample::new(45.0, 8.0)
    }

    /// A day's worth of samples with humidity rising then falling
    pub fn humidity_cycle(temp_c: f64) -> Vec<AmbientSample> {
        (0..=20)
            .chain((0..20).rev())
            .map(|i| AmbientSample::new(temp_c, 30.0 + 2.5 * i as f64))
            .collect()
    }
}
