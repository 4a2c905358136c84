use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Displays a progress bar counting completed calls across all workers.
///
/// When `no_progress` is set the returned bar is hidden but still counts, so callers do not need
/// to branch on it.
pub fn start_progress(planned_calls: u64, no_progress: bool) -> ProgressBar {
    if no_progress {
        let pb = ProgressBar::hidden();
        pb.set_length(planned_calls);
        return pb;
    }

    let pb = ProgressBar::new(planned_calls);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} calls [{elapsed_precise}]",
        )
        .expect("Failed to set progress style")
        .progress_chars("#>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(250));

    pb
}
