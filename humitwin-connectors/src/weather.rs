//! OpenWeatherMap Feed for Ambient Readings
//!
//! ## Overview
//!
//! Polls the OpenWeatherMap "current weather" endpoint for one city and turns
//! the response into an [`AmbientSample`]. Only two fields matter:
//!
//! ```json
//! { "main": { "temp": 21.4, "humidity": 57 } }
//! ```
//!
//! Requests ask for metric units, so `temp` arrives in °C and `humidity` in %.
//!
//! ## Implementation Choices
//!
//! - `ureq` keeps the client small and synchronous; each call runs on
//!   `tokio::task::spawn_blocking` so the runners stay responsive.
//! - 5xx, 429 and transport failures are retried with exponential backoff.
//!   Other 4xx (bad key, unknown city) fail immediately.
//! - Samples outside plausible atmospheric bounds are rejected here, before
//!   they reach the model.
//!
//! ## Example Usage
//!
//! ```no_run
//! use humitwin_connectors::weather::{OpenWeatherClient, WeatherConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WeatherConfig::new("Yekaterinburg,RU", "your-api-key")
//!     .timeout_secs(10)
//!     .max_retries(2);
//!
//! let mut client = OpenWeatherClient::new(config)?;
//! let sample = client.observe().await?;
//! println!("{} °C, {} %RH", sample.temperature_c, sample.relative_humidity_pct);
//! # Ok(())
//! # }
//! ```

use crate::{AmbientSource, ConnectionStats, ConnectorError};
use humitwin_core::{AmbientSample, TwinError};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default OpenWeatherMap API host
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Current-weather endpoint path
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "HUMITWIN_OWM_API_KEY";

/// Environment variable holding the city query
pub const CITY_ENV: &str = "HUMITWIN_CITY";

/// Weather feed errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Network or transport failure
    #[error("Request failed: {0}")]
    Request(String),

    /// Server answered with an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Serialization(String),

    /// Decoded sample is not physically plausible
    #[error("Implausible sample: {0}")]
    Implausible(TwinError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    /// Whether another attempt might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::ServerError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Weather feed configuration
#[derive(Clone)]
pub struct WeatherConfig {
    /// API host, without trailing slash
    pub base_url: String,
    /// City query, e.g. "Yekaterinburg,RU"
    pub city: String,
    /// OpenWeatherMap API key
    pub api_key: String,
    /// Unit system requested from the API
    pub units: String,
    /// Request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry
    pub retry_base_delay: Duration,
    /// User agent string
    pub user_agent: String,
}

impl WeatherConfig {
    /// Configuration for `city` using `api_key`
    pub fn new(city: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            city: city.into(),
            api_key: api_key.into(),
            units: "metric".into(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(200),
            user_agent: format!("HumiTwin/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Read city and API key from `HUMITWIN_CITY` and `HUMITWIN_OWM_API_KEY`
    pub fn from_env() -> Result<Self, WeatherError> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| WeatherError::Config(format!("{} is not set", name)))
        };
        Ok(Self::new(read(CITY_ENV)?, read(API_KEY_ENV)?))
    }

    /// Use another API host (mirrors, test servers)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the number of retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the delay before the first retry
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Backoff before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay
            .saturating_mul(1u32 << attempt.saturating_sub(1).min(16))
    }

    fn validate(&self) -> Result<(), WeatherError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(WeatherError::Config(
                "Base URL must start with http:// or https://".into(),
            ));
        }
        if self.city.trim().is_empty() {
            return Err(WeatherError::Config("City must not be empty".into()));
        }
        if self.api_key.trim().is_empty() {
            return Err(WeatherError::Config("API key must not be empty".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("base_url", &self.base_url)
            .field("city", &self.city)
            .field("api_key", &"<redacted>")
            .field("units", &self.units)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainBlock,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
}

/// Decode a current-weather response body into a validated sample
pub fn parse_observation(body: &str) -> Result<AmbientSample, WeatherError> {
    let weather: CurrentWeather =
        serde_json::from_str(body).map_err(|e| WeatherError::Serialization(e.to_string()))?;

    AmbientSample::validated(weather.main.temp, weather.main.humidity)
        .map_err(WeatherError::Implausible)
}

/// OpenWeatherMap client using the lightweight ureq agent
pub struct OpenWeatherClient {
    config: WeatherConfig,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl OpenWeatherClient {
    /// Create a client, validating the configuration
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        config.validate()?;

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: ConnectionStats::default(),
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Fetch the current observation, retrying transient failures
    pub async fn observe(&mut self) -> Result<AmbientSample, WeatherError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                self.stats.retries += 1;
                tokio::time::sleep(self.config.backoff(attempt)).await;
            }

            let request = self.build_request();
            let outcome = tokio::task::spawn_blocking(move || call(request))
                .await
                .map_err(|e| WeatherError::Request(e.to_string()))
                .and_then(|result| result);

            match outcome.and_then(|body| parse_observation(&body)) {
                Ok(sample) => {
                    self.stats.record_success();
                    log::debug!(
                        "Weather for {}: {} °C, {} %RH",
                        self.config.city,
                        sample.temperature_c,
                        sample.relative_humidity_pct
                    );
                    return Ok(sample);
                }
                Err(e) if e.is_retryable() => {
                    log::debug!("Weather attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e);
                }
                Err(e) => {
                    self.stats.record_failure(&e);
                    return Err(e);
                }
            }
        }

        // All retries exhausted
        let error = last_error.unwrap_or_else(|| WeatherError::Request("Unknown error".into()));
        self.stats.record_failure(&error);
        Err(error)
    }

    /// Build the current-weather request for the configured city
    fn build_request(&self) -> ureq::Request {
        let url = format!("{}{}", self.config.base_url, CURRENT_WEATHER_PATH);
        self.agent
            .get(&url)
            .query("q", &self.config.city)
            .query("appid", &self.config.api_key)
            .query("units", &self.config.units)
            .set("Accept", "application/json")
    }
}

/// Run one blocking request and return the body
fn call(request: ureq::Request) -> Result<String, WeatherError> {
    match request.call() {
        Ok(response) => response
            .into_string()
            .map_err(|e| WeatherError::Request(e.to_string())),
        Err(ureq::Error::Status(status, response)) => Err(WeatherError::ServerError {
            status,
            message: response.into_string().unwrap_or_default(),
        }),
        Err(ureq::Error::Transport(e)) => Err(WeatherError::Request(e.to_string())),
    }
}

#[async_trait::async_trait]
impl AmbientSource for OpenWeatherClient {
    async fn fetch(&mut self) -> Result<AmbientSample, ConnectorError> {
        Ok(self.observe().await?)
    }

    fn stats(&self) -> ConnectionStats {
        self.stats.clone()
    }
}
