mod init;
mod measure;
mod monitor;
mod pool;
mod progress;
mod run;
mod types;

pub mod prelude {
    pub use crate::init::init;
    pub use crate::measure::{measure, measure_with_progress};
    pub use crate::pool::{run_workers, WorkerOutcome};
    pub use crate::progress::start_progress;
    pub use crate::run::{run, RunOptions, RunReport};
    pub use crate::types::ProbeResult;

    pub use analysis_probe_core::prelude::*;
    pub use analysis_probe_instruments::{
        print_measurement_runs, report_operation, OperationRecord, ReportConfig, Reporter,
    };

    /// Re-exported so that benchmarks can take the progress handle without depending on indicatif.
    pub use indicatif::ProgressBar;
}
