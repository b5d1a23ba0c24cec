//! Drifting humidity twin
//!
//! Runs the random-walk twin at 30 Hz and prints a snapshot every five
//! seconds. When `HUMITWIN_CITY` and `HUMITWIN_OWM_API_KEY` are set the
//! live outdoor humidity is shown alongside; otherwise the twin runs alone.
//!
//! Run with: RUST_LOG=info cargo run --example console_twin

use humitwin_connectors::{
    weather::{OpenWeatherClient, WeatherConfig},
    AmbientSource, ConnectionStats, ConnectorError, ConsoleTwinRunner, LogSink, RunnerConfig,
};
use humitwin_core::{AmbientSample, DriftingHumidityTwin, RngNoise};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Weather client when configured, nothing otherwise
struct OptionalFeed(Option<OpenWeatherClient>);

#[async_trait::async_trait]
impl AmbientSource for OptionalFeed {
    async fn fetch(&mut self) -> Result<AmbientSample, ConnectorError> {
        match &mut self.0 {
            Some(client) => client.fetch().await,
            None => Err(ConnectorError::Config("weather feed not configured".into())),
        }
    }

    fn stats(&self) -> ConnectionStats {
        self.0.as_ref().map(|client| client.stats()).unwrap_or_default()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let feed = match WeatherConfig::from_env() {
        Ok(config) => Some(OpenWeatherClient::new(config)?),
        Err(e) => {
            println!("Running without weather feed: {}", e);
            None
        }
    };

    let twin = DriftingHumidityTwin::new(RngNoise::from_entropy());
    let mut runner =
        ConsoleTwinRunner::new(OptionalFeed(feed), twin, LogSink, RunnerConfig::default());

    let (stop, shutdown) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop.send(true);
        }
    });

    let updates = runner.run(shutdown).await;
    println!("Ran {} updates", updates);
    Ok(())
}
