//! Time-Related Constants
//!
//! Intervals used by the runners that drive the twin. The core itself never
//! waits; these only parameterize external loops.

/// Default weather feed poll interval (seconds).
///
/// Free OpenWeatherMap plans refresh observations roughly every 10 minutes;
/// polling once a minute keeps the twin fresh without hitting rate limits.
pub const DEFAULT_FETCH_INTERVAL_S: f64 = 60.0;

/// Default interval between console reports of the drifting twin (seconds).
pub const DEFAULT_LOG_INTERVAL_S: f64 = 5.0;

/// Update rate of the drifting twin (Hz).
pub const SENSOR_UPDATE_RATE_HZ: f64 = 30.0;

/// Update interval of the drifting twin (seconds).
pub const SENSOR_UPDATE_INTERVAL_S: f64 = 1.0 / SENSOR_UPDATE_RATE_HZ;
