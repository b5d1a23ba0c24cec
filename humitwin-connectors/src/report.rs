//! Reporting Sinks
//!
//! Runners hand every outcome to a [`ReportSink`]: physical twin readings,
//! drifting twin snapshots and feed failures. The sink decides what to do
//! with them; the core never formats anything.
//!
//! [`LogSink`] renders the same numbered block the bench operators read:
//!
//! ```text
//! [H3431Physical] 1) Temperature (API): 20.0 °C
//! [H3431Physical] 2) Relative humidity (API): 50.0 %
//! [H3431Physical] 3) Absolute humidity: 8.62 g/m³
//! [H3431Physical] 4) Relative humidity (model): 51.0 %
//! [H3431Physical] 5) Sensor capacitance: 1.07e-10 F
//! [H3431Physical] 6) Dew point: 9.5 °C
//! [H3431Physical] 7) Specific enthalpy: 38.5 kJ/kg
//! ```

use humitwin_core::{AmbientSample, SimulationResult, TwinError, TwinResult};

/// Log tag of the physical twin
pub const PHYSICAL_TAG: &str = "H3431Physical";

/// Log tag of the drifting twin
pub const CONSOLE_TAG: &str = "H3431Twin";

/// Outcome of one physical twin cycle
#[derive(Debug, Clone, PartialEq)]
pub struct TwinReport {
    /// Sample as delivered by the feed
    pub sample: AmbientSample,
    /// Absolute humidity derived from the sample (g/m³)
    pub absolute_humidity_g_m3: f64,
    /// Simulated sensor reading
    pub reading: TwinResult<SimulationResult>,
}

/// Snapshot of the drifting twin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsoleReport {
    /// Measured humidity (%)
    pub measured_pct: f64,
    /// True humidity (%)
    pub true_pct: f64,
    /// Flat measurement error bound (±%RH)
    pub accuracy_pct: f64,
    /// Latest humidity from the feed, if any (%)
    pub external_pct: Option<f64>,
}

/// Anything a runner reports
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Physical twin reading
    Physical(TwinReport),
    /// Drifting twin snapshot
    Console(ConsoleReport),
    /// Feed failure
    FetchFailed {
        /// Which runner failed
        tag: &'static str,
        /// Rendered error
        error: String,
    },
}

/// Destination for runner output
pub trait ReportSink: Send {
    /// Handle one report
    fn emit(&mut self, report: &Report);
}

/// Sink that writes through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn emit(&mut self, report: &Report) {
        match report {
            Report::Physical(twin) => match &twin.reading {
                Ok(_) => log::info!("{}", format_physical(twin)),
                Err(e) if e.is_singularity() => log::warn!("{}", format_physical(twin)),
                Err(_) => log::error!("{}", format_physical(twin)),
            },
            Report::Console(console) => log::info!("{}", format_console(console)),
            Report::FetchFailed { tag, error } => log::error!("[{}] Fetch failed: {}", tag, error),
        }
    }
}

/// Sink that keeps every report in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Reports in arrival order
    pub reports: Vec<Report>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Physical twin reports only
    pub fn physical(&self) -> impl Iterator<Item = &TwinReport> {
        self.reports.iter().filter_map(|r| match r {
            Report::Physical(twin) => Some(twin),
            _ => None,
        })
    }

    /// Drifting twin reports only
    pub fn console(&self) -> impl Iterator<Item = &ConsoleReport> {
        self.reports.iter().filter_map(|r| match r {
            Report::Console(console) => Some(console),
            _ => None,
        })
    }

    /// Number of feed failures seen
    pub fn failures(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r, Report::FetchFailed { .. }))
            .count()
    }
}

impl ReportSink for MemorySink {
    fn emit(&mut self, report: &Report) {
        self.reports.push(report.clone());
    }
}

/// Render a physical twin report as the numbered block
pub fn format_physical(report: &TwinReport) -> String {
    let mut lines = vec![
        format!("[{}] 1) Temperature (API): {:.1} °C", PHYSICAL_TAG, report.sample.temperature_c),
        format!(
            "[{}] 2) Relative humidity (API): {:.1} %",
            PHYSICAL_TAG, report.sample.relative_humidity_pct
        ),
        format!(
            "[{}] 3) Absolute humidity: {:.2} g/m³",
            PHYSICAL_TAG, report.absolute_humidity_g_m3
        ),
    ];

    match &report.reading {
        Ok(reading) => {
            lines.push(format!(
                "[{}] 4) Relative humidity (model): {:.1} %",
                PHYSICAL_TAG, reading.rh_pct
            ));
            lines.push(format!(
                "[{}] 5) Sensor capacitance: {:.2e} F",
                PHYSICAL_TAG, reading.capacitance_f
            ));
            lines.push(format!(
                "[{}] 6) Dew point: {:.1} °C",
                PHYSICAL_TAG, reading.dew_point_c
            ));
            lines.push(format!(
                "[{}] 7) Specific enthalpy: {:.1} kJ/kg",
                PHYSICAL_TAG, reading.enthalpy_kj_per_kg
            ));
        }
        Err(e) => lines.push(format!(
            "[{}] 4) Sensor reading unavailable: {}",
            PHYSICAL_TAG,
            describe(e)
        )),
    }

    lines.join("\n")
}

/// Render a drifting twin snapshot
pub fn format_console(report: &ConsoleReport) -> String {
    let external = match report.external_pct {
        Some(rh) => format!("{:.1}%", rh),
        None => "n/a".to_string(),
    };
    format!(
        "[{tag}] Internal humidity (measured): {:.1}% (true: {:.1}%, ±{}%RH)\n\
         [{tag}] External humidity: {}",
        report.measured_pct,
        report.true_pct,
        report.accuracy_pct,
        external,
        tag = CONSOLE_TAG,
    )
}

fn describe(error: &TwinError) -> String {
    match error {
        TwinError::Singularity { .. } => format!("{} (sensor reads 0% RH)", error),
        _ => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> SimulationResult {
        SimulationResult {
            rh_pct: 51.0,
            capacitance_f: 1.069_563_2e-10,
            dew_point_c: 9.55,
            enthalpy_kj_per_kg: 38.48,
        }
    }

    #[test]
    fn physical_block_has_seven_lines() {
        let report = TwinReport {
            sample: AmbientSample::new(20.0, 50.0),
            absolute_humidity_g_m3: 8.6208,
            reading: Ok(reading()),
        };
        let text = format_physical(&report);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[2], "[H3431Physical] 3) Absolute humidity: 8.62 g/m³");
        assert_eq!(lines[4], "[H3431Physical] 5) Sensor capacitance: 1.07e-10 F");
    }

    #[test]
    fn simulated_block_matches_reference() {
        use humitwin_core::{CapacitiveSensor, FixedNoise};

        let sample = AmbientSample::new(20.0, 50.0);
        let absolute_humidity_g_m3 = sample.absolute_humidity();
        let reading = CapacitiveSensor::new(FixedNoise::zero())
            .simulate(absolute_humidity_g_m3, sample.temperature_c);
        let text = format_physical(&TwinReport {
            sample,
            absolute_humidity_g_m3,
            reading,
        });

        let expected = [
            "[H3431Physical] 1) Temperature (API): 20.0 °C",
            "[H3431Physical] 2) Relative humidity (API): 50.0 %",
            "[H3431Physical] 3) Absolute humidity: 8.62 g/m³",
            "[H3431Physical] 4) Relative humidity (model): 51.0 %",
            "[H3431Physical] 5) Sensor capacitance: 1.07e-10 F",
            "[H3431Physical] 6) Dew point: 9.5 °C",
            "[H3431Physical] 7) Specific enthalpy: 38.5 kJ/kg",
        ];
        assert_eq!(text.lines().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn singular_reading_is_explained() {
        let report = TwinReport {
            sample: AmbientSample::new(20.0, 0.0),
            absolute_humidity_g_m3: 0.0,
            reading: Err(TwinError::Singularity { reason: "dew point undefined at 0% RH" }),
        };
        let text = format_physical(&report);
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("sensor reads 0% RH"));
    }

    #[test]
    fn console_line_without_feed() {
        let text = format_console(&ConsoleReport {
            measured_pct: 48.24,
            true_pct: 50.0,
            accuracy_pct: 2.5,
            external_pct: None,
        });
        assert!(text.contains("Internal humidity (measured): 48.2% (true: 50.0%, ±2.5%RH)"));
        assert!(text.ends_with("External humidity: n/a"));
    }

    #[test]
    fn memory_sink_filters() {
        let mut sink = MemorySink::new();
        sink.emit(&Report::FetchFailed {
            tag: PHYSICAL_TAG,
            error: "timeout".into(),
        });
        sink.emit(&Report::Console(ConsoleReport {
            measured_pct: 50.0,
            true_pct: 50.0,
            accuracy_pct: 2.5,
            external_pct: Some(60.0),
        }));

        assert_eq!(sink.failures(), 1);
        assert_eq!(sink.console().count(), 1);
        assert_eq!(sink.physical().count(), 0);
    }
}
