//! Runner integration tests
//!
//! Drive both runners against a scripted source on tokio's paused clock,
//! so a minute-long fetch interval costs no wall time.

mod common;

use common::{ScriptedSource, Step};
use humitwin_connectors::{
    report::Report, AmbientSource, ConnectorError, ConsoleTwinRunner, MemorySink,
    PhysicalTwinRunner, RunnerConfig,
};
use humitwin_core::{
    AmbientSample, CapacitiveSensor, DriftingHumidityTwin, FixedNoise, SequenceNoise, TwinError,
};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

fn physical_runner(
    source: ScriptedSource,
) -> PhysicalTwinRunner<ScriptedSource, FixedNoise, MemorySink> {
    PhysicalTwinRunner::new(
        source,
        CapacitiveSensor::new(FixedNoise::zero()),
        MemorySink::new(),
        RunnerConfig::default(),
    )
}

#[tokio::test]
async fn test_cycle_reports_reading() {
    let mut runner =
        physical_runner(ScriptedSource::new([Step::Sample(AmbientSample::new(20.0, 50.0))]));

    let report = runner.run_once().await.unwrap();
    let reading = report.reading.unwrap();

    assert!((report.absolute_humidity_g_m3 - 8.65).abs() < 0.05);
    // Rising from an empty history adds the hysteresis step
    assert!((reading.rh_pct - 51.0).abs() < 1e-6);
    assert!(reading.capacitance_f > 70e-12 && reading.capacitance_f < 142e-12);
    assert_eq!(runner.sink().physical().count(), 1);
}

#[tokio::test]
async fn test_fetch_failure_keeps_sensor_state() {
    let mut runner = physical_runner(ScriptedSource::new([
        Step::Sample(AmbientSample::new(20.0, 50.0)),
        Step::Fail("connection reset"),
        Step::Sample(AmbientSample::new(20.0, 50.0)),
    ]));

    runner.run_once().await.unwrap();
    let state = runner.sensor().state();

    let error = runner.run_once().await.unwrap_err();
    assert!(matches!(error, ConnectorError::Weather(_)));
    assert_eq!(runner.sensor().state(), state);

    // Same input, reading no longer above history: hysteresis flips down
    let report = runner.run_once().await.unwrap();
    assert!((report.reading.unwrap().rh_pct - 49.0).abs() < 1e-6);

    let sink = runner.sink();
    assert_eq!(sink.failures(), 1);
    assert_eq!(sink.physical().count(), 2);
    assert!(matches!(
        &sink.reports[1],
        Report::FetchFailed { tag, error }
            if *tag == "H3431Physical" && error.contains("connection reset")
    ));
}

#[tokio::test]
async fn test_dry_air_reports_singularity() {
    let mut runner =
        physical_runner(ScriptedSource::new([Step::Sample(AmbientSample::new(20.0, 0.0))]));

    let report = runner.run_once().await.unwrap();

    assert!(matches!(report.reading, Err(TwinError::Singularity { .. })));
    // History still advances below zero
    assert!((runner.sensor().state().last_modeled_rh_pct + 1.0).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn test_run_polls_on_interval() {
    let mut runner = physical_runner(ScriptedSource::constant(AmbientSample::new(25.0, 60.0)));
    let (stop, shutdown) = watch::channel(false);

    // Ticks at 0 s, 60 s and 120 s
    let (cycles, _) = tokio::join!(runner.run(shutdown), async {
        tokio::time::sleep(Duration::from_secs(150)).await;
        stop.send(true).unwrap();
    });

    assert_eq!(cycles, 3);
    assert_eq!(runner.sink().physical().count(), 3);
    assert_eq!(runner.source().served(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_run_survives_failures() {
    let mut runner = physical_runner(ScriptedSource::new([
        Step::Fail("timeout"),
        Step::Fail("timeout"),
        Step::Sample(AmbientSample::new(10.0, 80.0)),
    ]));
    let (stop, shutdown) = watch::channel(false);

    let (cycles, _) = tokio::join!(runner.run(shutdown), async {
        tokio::time::sleep(Duration::from_secs(130)).await;
        stop.send(true).unwrap();
    });

    assert_eq!(cycles, 3);
    assert_eq!(runner.sink().failures(), 2);
    assert_eq!(runner.sink().physical().count(), 1);
    assert_eq!(runner.source().stats().fetches_failed, 2);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_interrupts_slow_fetch() {
    let source = ScriptedSource::constant(AmbientSample::new(20.0, 50.0))
        .with_latency(Duration::from_secs(20));
    let mut runner = physical_runner(source);
    let (stop, shutdown) = watch::channel(false);
    let started = Instant::now();

    let (cycles, _) = tokio::join!(runner.run(shutdown), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        stop.send(true).unwrap();
    });

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(cycles, 0);
    assert!(runner.sink().reports.is_empty());
    assert_eq!(runner.source().served(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_when_sender_dropped() {
    let mut runner = physical_runner(ScriptedSource::constant(AmbientSample::new(20.0, 50.0)));
    let (stop, shutdown) = watch::channel(false);

    let (cycles, _) = tokio::join!(runner.run(shutdown), async move {
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(stop);
    });

    assert_eq!(cycles, 1);
}

#[tokio::test]
async fn test_console_refresh_records_external_humidity() {
    let mut runner = ConsoleTwinRunner::new(
        ScriptedSource::new([
            Step::Sample(AmbientSample::new(5.0, 72.0)),
            Step::Fail("rate limited"),
        ]),
        DriftingHumidityTwin::new(FixedNoise::zero()),
        MemorySink::new(),
        RunnerConfig::default(),
    );

    assert_eq!(runner.refresh_external().await.unwrap(), 72.0);
    assert!(runner.refresh_external().await.is_err());

    // A failed poll keeps the previous value
    let report = runner.report();
    assert_eq!(report.external_pct, Some(72.0));
    assert_eq!(report.measured_pct, 50.0);
    assert_eq!(report.accuracy_pct, 2.5);
    assert_eq!(runner.sink().failures(), 1);
}

#[tokio::test]
async fn test_console_advance_moves_twin() {
    // Drift draws +0.5 %RH/s, error draws -2.5 %RH
    let mut runner = ConsoleTwinRunner::new(
        ScriptedSource::default(),
        DriftingHumidityTwin::new(SequenceNoise::new([1.0, -1.0])).with_update_interval(0.5),
        MemorySink::new(),
        RunnerConfig::default(),
    );

    assert_eq!(runner.advance(Duration::from_secs(2)), 4);
    assert!((runner.twin().true_humidity() - 51.0).abs() < 1e-9);
    assert!((runner.twin().measured_humidity() - 48.5).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn test_console_run_cadences() {
    let mut runner = ConsoleTwinRunner::new(
        ScriptedSource::constant(AmbientSample::new(18.0, 64.0)),
        DriftingHumidityTwin::new(FixedNoise::zero()),
        MemorySink::new(),
        RunnerConfig::default(),
    );
    let (stop, shutdown) = watch::channel(false);

    let (updates, _) = tokio::join!(runner.run(shutdown), async {
        tokio::time::sleep(Duration::from_secs(12)).await;
        stop.send(true).unwrap();
    });

    // About 30 updates per second over 12 s
    assert!((350..=361).contains(&updates), "updates = {}", updates);

    // Snapshots at 5 s and 10 s, one fetch at start
    let snapshots: Vec<_> = runner.sink().console().copied().collect();
    assert_eq!(snapshots.len(), 2);
    assert!(snapshots.iter().all(|s| s.external_pct == Some(64.0)));
    assert_eq!(runner.twin().external_humidity(), Some(64.0));
    assert_eq!(runner.sink().failures(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_console_keeps_ticking_during_slow_fetch() {
    let source = ScriptedSource::constant(AmbientSample::new(18.0, 64.0))
        .with_latency(Duration::from_secs(20));
    let mut runner = ConsoleTwinRunner::new(
        source,
        DriftingHumidityTwin::new(FixedNoise::zero()),
        MemorySink::new(),
        RunnerConfig::default(),
    );
    let (stop, shutdown) = watch::channel(false);
    let started = Instant::now();

    let (updates, _) = tokio::join!(runner.run(shutdown), async {
        tokio::time::sleep(Duration::from_millis(19_900)).await;
        stop.send(true).unwrap();
    });

    // Shutdown lands before the first fetch answers
    assert!(started.elapsed() < Duration::from_secs(20));
    assert!(updates > 550, "updates = {}", updates);

    // Snapshots at 5 s, 10 s and 15 s, all without feed data
    let snapshots: Vec<_> = runner.sink().console().copied().collect();
    assert_eq!(snapshots.len(), 3);
    assert!(snapshots.iter().all(|s| s.external_pct.is_none()));
    assert_eq!(runner.twin().external_humidity(), None);
}

#[tokio::test(start_paused = true)]
async fn test_console_picks_up_slow_fetch() {
    let source = ScriptedSource::constant(AmbientSample::new(18.0, 64.0))
        .with_latency(Duration::from_secs(7));
    let mut runner = ConsoleTwinRunner::new(
        source,
        DriftingHumidityTwin::new(FixedNoise::zero()),
        MemorySink::new(),
        RunnerConfig::default(),
    );
    let (stop, shutdown) = watch::channel(false);

    tokio::join!(runner.run(shutdown), async {
        tokio::time::sleep(Duration::from_secs(12)).await;
        stop.send(true).unwrap();
    });

    // The 5 s snapshot precedes the answer at 7 s, the 10 s one follows it
    let snapshots: Vec<_> = runner.sink().console().map(|s| s.external_pct).collect();
    assert_eq!(snapshots, [None, Some(64.0)]);
}
