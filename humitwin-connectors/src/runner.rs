//! Polling Runners
//!
//! Plain tokio loops that drive the twins. Each runner owns its source,
//! its twin and its sink, so calls into the model are serialized by
//! construction. Stopping is cooperative: flip the `watch` channel passed
//! to `run` to `true` (or drop its sender).
//!
//! ## Physical twin cycle
//!
//! ```text
//! every fetch_interval:
//!     sample  = source.fetch()                      (failure → FetchFailed, keep going)
//!     ρ       = absolute_humidity(sample.rh, sample.t)
//!     reading = sensor.simulate(ρ, sample.t)
//!     sink.emit(Physical { sample, ρ, reading })
//! ```
//!
//! ## Drifting twin cycle
//!
//! Three independent cadences:
//! - update (30 Hz): advance the twin by the real elapsed time
//! - log (5 s): emit a console snapshot
//! - fetch (60 s): refresh the external humidity shown next to it
//!
//! The feed is polled by its own future and hands samples back over a
//! channel, so a fetch stuck in timeouts and retries never holds up the
//! updates or the snapshots.
//!
//! ## Shutdown
//!
//! Both runners race in-flight work against the shutdown channel. A fetch
//! still pending when shutdown arrives is dropped.

use crate::{
    report::{ConsoleReport, Report, ReportSink, TwinReport, CONSOLE_TAG, PHYSICAL_TAG},
    AmbientSource, ConnectorError,
};
use humitwin_core::{
    constants::time::{DEFAULT_FETCH_INTERVAL_S, DEFAULT_LOG_INTERVAL_S, SENSOR_UPDATE_INTERVAL_S},
    AmbientSample, CapacitiveSensor, DriftingHumidityTwin, NoiseSource,
};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, MissedTickBehavior};

/// Runner intervals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunnerConfig {
    /// Time between feed polls
    pub fetch_interval: Duration,
    /// Time between drifting twin snapshots
    pub log_interval: Duration,
    /// Time between drifting twin updates
    pub update_interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fetch_interval: Duration::from_secs_f64(DEFAULT_FETCH_INTERVAL_S),
            log_interval: Duration::from_secs_f64(DEFAULT_LOG_INTERVAL_S),
            update_interval: Duration::from_secs_f64(SENSOR_UPDATE_INTERVAL_S),
        }
    }
}

impl RunnerConfig {
    /// Set the feed poll interval in seconds
    pub fn fetch_interval_secs(mut self, secs: f64) -> Self {
        self.fetch_interval = positive_secs(secs, self.fetch_interval);
        self
    }

    /// Set the snapshot interval in seconds
    pub fn log_interval_secs(mut self, secs: f64) -> Self {
        self.log_interval = positive_secs(secs, self.log_interval);
        self
    }

    /// Set the update interval in seconds
    pub fn update_interval_secs(mut self, secs: f64) -> Self {
        self.update_interval = positive_secs(secs, self.update_interval);
        self
    }
}

/// Keep `fallback` for zero, negative or non-finite input
fn positive_secs(secs: f64, fallback: Duration) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        fallback
    }
}

/// True once shutdown was requested or the sender is gone
fn should_stop(
    changed: Result<(), watch::error::RecvError>,
    shutdown: &watch::Receiver<bool>,
) -> bool {
    changed.is_err() || *shutdown.borrow()
}

type FetchResult = Result<AmbientSample, ConnectorError>;

/// Fetch on a fixed cadence and forward every outcome
///
/// Returns once the receiving side is gone.
async fn poll_feed<S: AmbientSource>(
    source: &mut S,
    every: Duration,
    results: mpsc::Sender<FetchResult>,
) {
    let mut fetches = interval(every);
    fetches.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        fetches.tick().await;
        if results.send(source.fetch().await).await.is_err() {
            break;
        }
    }
}

/// Fetch → convert → simulate → report loop for the capacitive twin
pub struct PhysicalTwinRunner<S, N, K> {
    source: S,
    sensor: CapacitiveSensor<N>,
    sink: K,
    config: RunnerConfig,
}

impl<S, N, K> PhysicalTwinRunner<S, N, K>
where
    S: AmbientSource,
    N: NoiseSource + Send,
    K: ReportSink,
{
    pub fn new(source: S, sensor: CapacitiveSensor<N>, sink: K, config: RunnerConfig) -> Self {
        Self {
            source,
            sensor,
            sink,
            config,
        }
    }

    /// Run a single cycle and report its outcome
    pub async fn run_once(&mut self) -> Result<TwinReport, ConnectorError> {
        let sample = match self.source.fetch().await {
            Ok(sample) => sample,
            Err(e) => {
                self.sink.emit(&Report::FetchFailed {
                    tag: PHYSICAL_TAG,
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let absolute_humidity_g_m3 = sample.absolute_humidity();
        let reading = self.sensor.simulate(absolute_humidity_g_m3, sample.temperature_c);

        let report = TwinReport {
            sample,
            absolute_humidity_g_m3,
            reading,
        };
        self.sink.emit(&Report::Physical(report.clone()));
        Ok(report)
    }

    /// Poll until shutdown; returns the number of cycles run
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut ticker = interval(self.config.fetch_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles = 0;

        log::info!(
            "[{}] Polling every {:?}",
            PHYSICAL_TAG,
            self.config.fetch_interval
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if should_stop(changed, &shutdown) {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    tokio::select! {
                        changed = shutdown.changed() => {
                            if should_stop(changed, &shutdown) {
                                break;
                            }
                        }
                        // Failures are already reported to the sink
                        _ = self.run_once() => cycles += 1,
                    }
                }
            }
        }

        log::info!("[{}] Stopped after {} cycles", PHYSICAL_TAG, cycles);
        cycles
    }

    /// The simulated sensor
    pub fn sensor(&self) -> &CapacitiveSensor<N> {
        &self.sensor
    }

    /// The report sink
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// The ambient source
    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Update/log/fetch loop for the drifting comparison twin
pub struct ConsoleTwinRunner<S, N, K> {
    source: S,
    twin: DriftingHumidityTwin<N>,
    sink: K,
    config: RunnerConfig,
}

impl<S, N, K> ConsoleTwinRunner<S, N, K>
where
    S: AmbientSource,
    N: NoiseSource + Send,
    K: ReportSink,
{
    pub fn new(source: S, twin: DriftingHumidityTwin<N>, sink: K, config: RunnerConfig) -> Self {
        Self {
            source,
            twin,
            sink,
            config,
        }
    }

    /// Advance the twin by `elapsed`; returns the number of updates run
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.twin.advance(elapsed.as_secs_f64())
    }

    /// Emit a snapshot of the twin
    pub fn report(&mut self) -> ConsoleReport {
        snapshot(&self.twin, &mut self.sink)
    }

    /// Poll the feed once and record its humidity
    pub async fn refresh_external(&mut self) -> Result<f64, ConnectorError> {
        let fetched = self.source.fetch().await;
        record_external(&mut self.twin, &mut self.sink, fetched)
    }

    /// Run until shutdown; returns the number of twin updates run
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let config = self.config;
        let Self {
            source, twin, sink, ..
        } = self;

        let mut updates = interval(config.update_interval);
        let mut logs = interval(config.log_interval);
        updates.set_missed_tick_behavior(MissedTickBehavior::Delay);
        logs.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first log tick fires immediately; skip it so the first
        // snapshot covers a full interval like the later ones
        logs.reset();

        let (results, mut fetched) = mpsc::channel(1);
        let polling = poll_feed(source, config.fetch_interval, results);
        tokio::pin!(polling);
        let mut polling_done = false;

        let mut last_update = Instant::now();
        let mut total = 0u64;

        log::info!(
            "[{}] Updating every {:?}, logging every {:?}, polling every {:?}",
            CONSOLE_TAG,
            config.update_interval,
            config.log_interval,
            config.fetch_interval
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if should_stop(changed, &shutdown) {
                        break;
                    }
                }
                _ = &mut polling, if !polling_done => polling_done = true,
                Some(result) = fetched.recv() => {
                    // Failures are already reported to the sink
                    let _ = record_external(twin, sink, result);
                }
                _ = updates.tick() => {
                    let now = Instant::now();
                    total += u64::from(twin.advance((now - last_update).as_secs_f64()));
                    last_update = now;
                }
                _ = logs.tick() => {
                    snapshot(twin, sink);
                }
            }
        }

        log::info!("[{}] Stopped after {} updates", CONSOLE_TAG, total);
        total
    }

    /// The drifting twin
    pub fn twin(&self) -> &DriftingHumidityTwin<N> {
        &self.twin
    }

    /// The report sink
    pub fn sink(&self) -> &K {
        &self.sink
    }
}

fn snapshot<N: NoiseSource, K: ReportSink>(
    twin: &DriftingHumidityTwin<N>,
    sink: &mut K,
) -> ConsoleReport {
    let report = ConsoleReport {
        measured_pct: twin.measured_humidity(),
        true_pct: twin.true_humidity(),
        accuracy_pct: twin.spec().accuracy_pct,
        external_pct: twin.external_humidity(),
    };
    sink.emit(&Report::Console(report));
    report
}

fn record_external<N: NoiseSource, K: ReportSink>(
    twin: &mut DriftingHumidityTwin<N>,
    sink: &mut K,
    fetched: FetchResult,
) -> Result<f64, ConnectorError> {
    match fetched {
        Ok(sample) => {
            twin.set_external_humidity(sample.relative_humidity_pct);
            Ok(sample.relative_humidity_pct)
        }
        Err(e) => {
            sink.emit(&Report::FetchFailed {
                tag: CONSOLE_TAG,
                error: e.to_string(),
            });
            Err(e)
        }
    }
}
