mod runs_table;
mod summary_report;

use crate::OperationRecord;
use parking_lot::Mutex;

pub use runs_table::{measurement_rows, print_measurement_runs, MeasurementRow};
pub use summary_report::{OperationRow, SummaryReportCollector};

pub trait ReportCollector {
    fn add_operation(&mut self, operation_record: &OperationRecord);

    fn finalize(&self);
}

/// Selects which collectors a [Reporter] feeds.
#[derive(Debug, Default)]
pub struct ReportConfig {
    enable_summary: bool,
}

impl ReportConfig {
    /// Keep every operation in memory and print a per-operation table when the reporter is
    /// finalized.
    pub fn enable_summary(mut self) -> Self {
        self.enable_summary = true;
        self
    }

    pub fn init(self) -> Reporter {
        Reporter {
            summary: self
                .enable_summary
                .then(|| Mutex::new(SummaryReportCollector::new())),
        }
    }
}

/// Shared sink for operation records. Instrumented clients on any number of worker threads may
/// report into the same reporter.
pub struct Reporter {
    summary: Option<Mutex<SummaryReportCollector>>,
}

impl Reporter {
    pub(crate) fn add_operation(&self, operation_record: &OperationRecord) {
        if let Some(summary) = &self.summary {
            summary.lock().add_operation(operation_record);
        }
    }

    /// Rows of the per-operation summary, ordered by operation id. Empty when the summary is
    /// disabled.
    pub fn summary_rows(&self) -> Vec<OperationRow> {
        self.summary
            .as_ref()
            .map(|summary| summary.lock().rows())
            .unwrap_or_default()
    }

    pub fn finalize(&self) {
        if let Some(summary) = &self.summary {
            summary.lock().finalize();
        }
    }
}
