//! Constants for the HumiTwin core
//!
//! This module provides centralized, documented constants used throughout
//! the simulation. Every numeric value the model depends on lives here with
//! its unit and source.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Physics**: Fundamental constants and psychrometric coefficients
//! - **Sensors**: H3431 capacitive sensor datasheet values
//! - **Time**: Polling, logging and update intervals
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Include the unit in the name
//! 3. Reference the datasheet or standard the value comes from

/// Physical constants and psychrometric coefficients.
pub mod physics;

/// H3431 sensor specification and geometry.
pub mod sensors;

/// Polling, logging and update intervals.
pub mod time;

// Re-export commonly used constants for convenience
pub use physics::{
    KELVIN_OFFSET, VACUUM_PERMITTIVITY_F_PER_M, WATER_VAPOR_GAS_CONSTANT_J_PER_KG_K,
    STANDARD_PRESSURE_PA,
};

pub use sensors::{
    HUMIDITY_SENSOR_MIN_PCT, HUMIDITY_SENSOR_MAX_PCT, HUMIDITY_ACCURACY_PCT,
    HYSTERESIS_STEP_PCT,
};

pub use time::{
    DEFAULT_FETCH_INTERVAL_S, DEFAULT_LOG_INTERVAL_S, SENSOR_UPDATE_INTERVAL_S,
};
