mod operations_table;

use crate::report::ReportCollector;
use crate::OperationRecord;
use itertools::Itertools;
use tabled::settings::Style;
use tabled::Table;

pub use operations_table::OperationRow;

/// Keeps all of the operations in memory and prints a summary of the operations at the end of the
/// run.
#[derive(Default)]
pub struct SummaryReportCollector {
    operation_records: Vec<OperationRecord>,
}

impl SummaryReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn rows(&self) -> Vec<OperationRow> {
        self.operation_records
            .iter()
            .into_group_map_by(|record| record.operation_id.clone())
            .into_iter()
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(operation_id, operations)| {
                let total_operations = operations.len();
                let errors = operations.iter().filter(|op| op.is_error).count();
                let durations_micro = operations
                    .iter()
                    .map(|op| op.duration().unwrap_or_default().as_micros())
                    .collect::<Vec<_>>();
                let total_duration_micro = durations_micro.iter().sum::<u128>();

                // Failed calls often return early, so they are left out of the min/max.
                let succeeded = operations
                    .iter()
                    .filter(|op| !op.is_error)
                    .map(|op| op.duration().unwrap_or_default().as_micros());
                let (min_micro, max_micro) = match succeeded.minmax().into_option() {
                    Some((min, max)) => (min, max),
                    None => (0, 0),
                };

                OperationRow {
                    operation_id,
                    total_operations,
                    errors,
                    total_duration_ms: total_duration_micro as f64 / 1000.0,
                    avg_time_ms: (total_duration_micro as f64 / total_operations as f64) / 1000.0,
                    min_time_ms: min_micro as f64 / 1000.0,
                    max_time_ms: max_micro as f64 / 1000.0,
                }
            })
            .collect()
    }
}

impl ReportCollector for SummaryReportCollector {
    fn add_operation(&mut self, operation_record: &OperationRecord) {
        self.operation_records.push(operation_record.clone());
    }

    fn finalize(&self) {
        let rows = self.rows();
        if rows.is_empty() {
            log::info!("No operations were recorded");
            return;
        }

        let mut table = Table::new(rows);
        table.with(Style::modern());

        println!("\nSummary of operations");
        println!("{table}");
    }
}
