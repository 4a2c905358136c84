mod report;

use std::time::{Duration, Instant};

pub use report::{
    measurement_rows, print_measurement_runs, MeasurementRow, OperationRow, ReportCollector,
    ReportConfig, Reporter, SummaryReportCollector,
};

/// Timing of a single instrumented API operation.
#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub operation_id: String,
    started: Instant,
    pub elapsed: Option<Duration>,
    pub is_error: bool,
}

impl OperationRecord {
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            operation_id: operation_id.into(),
            started: Instant::now(),
            elapsed: None,
            is_error: false,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.elapsed
    }

    pub(crate) fn finish(&mut self, is_error: bool) {
        self.elapsed = Some(self.started.elapsed());
        self.is_error = is_error;
    }
}

/// Complete the operation record with the outcome of the operation and hand it to the reporter.
///
/// An operation that returned an error is recorded as failed. Responses with an unexpected HTTP
/// status are still successful operations here.
pub fn report_operation<T, E>(
    reporter: Option<&Reporter>,
    mut operation_record: OperationRecord,
    response: &Result<T, E>,
) {
    operation_record.finish(response.is_err());

    log::trace!(
        "Operation {} took {}ms, and failed? {:?}",
        operation_record.operation_id,
        operation_record.elapsed.unwrap_or_default().as_millis(),
        operation_record.is_error,
    );

    if let Some(reporter) = reporter {
        reporter.add_operation(&operation_record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_operation_marks_errors() {
        let reporter = ReportConfig::default().enable_summary().init();

        report_operation(Some(&reporter), OperationRecord::new("ok_op"), &Ok::<_, ()>(()));
        report_operation(Some(&reporter), OperationRecord::new("bad_op"), &Err::<(), _>("boom"));

        let rows = reporter.summary_rows();
        assert_eq!(2, rows.len());
        let bad = rows.iter().find(|r| r.operation_id == "bad_op").unwrap();
        assert_eq!(1, bad.errors);
        let ok = rows.iter().find(|r| r.operation_id == "ok_op").unwrap();
        assert_eq!(0, ok.errors);
    }

    #[test]
    fn report_without_reporter_is_a_no_op() {
        report_operation(None, OperationRecord::new("unreported"), &Ok::<_, ()>(1));
    }
}
