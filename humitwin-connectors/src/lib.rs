//! Connectors that drive the HumiTwin core
//!
//! ## Overview
//!
//! The simulation core only computes. This crate supplies everything around
//! it: the ambient data feed, the reporting sinks, and the loops that tie
//! them together on a timer.
//!
//! ```text
//! AmbientSource ──fetch──▶ AmbientSample ──▶ CapacitiveSensor ──▶ ReportSink
//!      ▲                                                              │
//!      └────────────────── runner (tokio interval) ◀─────────────────┘
//! ```
//!
//! ## Sources
//!
//! [`weather::OpenWeatherClient`] polls the OpenWeatherMap current-weather
//! endpoint and reads `main.temp` and `main.humidity`. Anything that can
//! produce an [`AmbientSample`] can implement [`AmbientSource`] instead.
//!
//! ## Sinks
//!
//! [`report::LogSink`] writes readings through the `log` facade.
//! [`report::MemorySink`] keeps them for inspection in tests.
//!
//! ## Runners
//!
//! - [`runner::PhysicalTwinRunner`]: fetch → convert → simulate → report,
//!   once per fetch interval (60 s by default).
//! - [`runner::ConsoleTwinRunner`]: the drifting comparison twin, updated
//!   at 30 Hz and reported every log interval.
//!
//! Both stop when their shutdown channel flips to `true`.
//!
//! ## Example Usage
//!
//! ```no_run
//! use humitwin_connectors::{
//!     report::LogSink,
//!     runner::{PhysicalTwinRunner, RunnerConfig},
//!     weather::{OpenWeatherClient, WeatherConfig},
//! };
//! use humitwin_core::{CapacitiveSensor, RngNoise};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenWeatherClient::new(WeatherConfig::new("Yekaterinburg,RU", "api-key"))?;
//! let sensor = CapacitiveSensor::new(RngNoise::from_entropy());
//! let mut runner = PhysicalTwinRunner::new(client, sensor, LogSink, RunnerConfig::default());
//!
//! let (_stop, shutdown) = tokio::sync::watch::channel(false);
//! runner.run(shutdown).await;
//! # Ok(())
//! # }
//! ```

pub mod report;
pub mod runner;
pub mod weather;

// Re-export common types
pub use report::{ConsoleReport, LogSink, MemorySink, Report, ReportSink, TwinReport};
pub use runner::{ConsoleTwinRunner, PhysicalTwinRunner, RunnerConfig};
pub use weather::{OpenWeatherClient, WeatherConfig, WeatherError};

use humitwin_core::AmbientSample;
use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Weather feed: {0}")]
    Weather(#[from] WeatherError),

    #[error("Source exhausted")]
    Exhausted,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Source of ambient samples
///
/// Implementations may block or wait on the network; the runners call
/// `fetch` once per fetch interval and never concurrently.
#[async_trait::async_trait]
pub trait AmbientSource: Send {
    /// Fetch the current ambient sample
    async fn fetch(&mut self) -> Result<AmbientSample, ConnectorError>;

    /// Get fetch statistics
    fn stats(&self) -> ConnectionStats;
}

/// Fetch statistics common to all sources
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Samples fetched successfully
    pub fetches_ok: u64,
    /// Fetches that failed after all retries
    pub fetches_failed: u64,
    /// Retries issued
    pub retries: u64,
    /// Last error message
    pub last_error: Option<String>,
}

impl ConnectionStats {
    pub(crate) fn record_success(&mut self) {
        self.fetches_ok += 1;
    }

    pub(crate) fn record_failure(&mut self, error: &impl std::fmt::Display) {
        self.fetches_failed += 1;
        self.last_error = Some(error.to_string());
    }
}
