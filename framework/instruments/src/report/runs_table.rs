use analysis_probe_core::prelude::MeasurementRun;
use std::time::Duration;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Latency statistics of one measurement loop.
#[derive(Debug, Clone, Tabled)]
pub struct MeasurementRow {
    pub thread: String,
    pub calls: usize,
    pub failed_checks: usize,
    #[tabled(display = "float2")]
    pub avg_ms: f64,
    #[tabled(display = "float2")]
    pub median_ms: f64,
    #[tabled(display = "float2")]
    pub min_ms: f64,
    #[tabled(display = "float2")]
    pub max_ms: f64,
    pub debug_records: usize,
}

fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}

fn millis(d: Option<Duration>) -> f64 {
    d.map(|d| d.as_micros() as f64 / 1000.0).unwrap_or_default()
}

pub fn measurement_rows(runs: &[MeasurementRun]) -> Vec<MeasurementRow> {
    runs.iter()
        .map(|run| MeasurementRow {
            thread: run
                .thread_id
                .map(|id| format!("#{id}"))
                .unwrap_or_else(|| "main".to_string()),
            calls: run.len(),
            failed_checks: run.failed_checks,
            avg_ms: millis(run.mean_delta()),
            median_ms: millis(run.median_delta()),
            min_ms: millis(run.min_delta()),
            max_ms: millis(run.max_delta()),
            debug_records: run.debug.len(),
        })
        .collect()
}

/// Print a table with one row of latency statistics per measurement loop.
pub fn print_measurement_runs(benchmark: &str, runs: &[MeasurementRun]) {
    let mut table = Table::new(measurement_rows(runs));
    table.with(Style::modern());

    println!("\nMeasurements for {benchmark}");
    println!("{table}");
}
