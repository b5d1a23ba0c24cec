//! Physical twin against the live weather feed
//!
//! Polls OpenWeatherMap once a minute, converts the reading to absolute
//! humidity and runs it through the capacitive sensor model.
//!
//! Needs `HUMITWIN_CITY` (e.g. "Yekaterinburg,RU") and
//! `HUMITWIN_OWM_API_KEY`. Stop with Ctrl-C.
//!
//! Run with: RUST_LOG=info cargo run --example physical_twin

use humitwin_connectors::{
    weather::{OpenWeatherClient, WeatherConfig},
    LogSink, PhysicalTwinRunner, RunnerConfig,
};
use humitwin_core::{CapacitiveSensor, RngNoise};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = WeatherConfig::from_env()?;
    let client = OpenWeatherClient::new(config)?;
    let sensor = CapacitiveSensor::new(RngNoise::from_entropy());
    let mut runner = PhysicalTwinRunner::new(client, sensor, LogSink, RunnerConfig::default());

    let (stop, shutdown) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop.send(true);
        }
    });

    let cycles = runner.run(shutdown).await;
    println!("Ran {} cycles", cycles);
    Ok(())
}
