use std::sync::mpsc::Sender;
use std::time::Duration;

use analysis_probe_core::prelude::{MeasurementRun, StopHandle};
use analysis_probe_instruments::print_measurement_runs;
use indicatif::ProgressBar;

use crate::monitor::start_monitor;
use crate::pool::{run_workers, WorkerOutcome};
use crate::progress::start_progress;

/// How a benchmark should be run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Name of the benchmark, used in logs and in the printed tables.
    pub name: String,
    /// Number of worker threads. With one thread the benchmark runs in single-threaded mode on
    /// the calling thread, which also enforces the result check of every call.
    pub thread_count: usize,
    /// Number of calls made by each worker.
    pub measurement_count: usize,
    /// Pause between two calls of the same worker.
    pub pause: Duration,
    pub no_progress: bool,
}

/// Outcome of a benchmark run.
#[derive(Debug)]
pub struct RunReport {
    /// Unique id of this run, so that log output of concurrent runs can be told apart.
    pub run_id: String,
    pub name: String,
    pub outcomes: Vec<WorkerOutcome>,
}

impl RunReport {
    /// Measurement runs of the workers that completed, ordered by thread id.
    pub fn runs(&self) -> Vec<MeasurementRun> {
        let mut runs = self
            .outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().cloned())
            .collect::<Vec<_>>();
        runs.sort_by_key(|run| run.thread_id);
        runs
    }

    /// Workers that stopped with an error.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &anyhow::Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.thread_id, e)))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Run a benchmark either in single-threaded mode, using `single`, or across
/// [RunOptions::thread_count] worker threads, using `worker`.
///
/// While the benchmark runs a progress bar is shown (unless disabled) and the CPU usage of the
/// harness is monitored. Once all workers are done a table of per-worker latency statistics is
/// printed.
pub fn run<S, W>(options: &RunOptions, single: S, worker: W) -> anyhow::Result<RunReport>
where
    S: FnOnce(&ProgressBar) -> anyhow::Result<MeasurementRun>,
    W: Fn(usize, Sender<WorkerOutcome>, &ProgressBar) + Send + Sync + 'static,
{
    let run_id = nanoid::nanoid!();
    log::info!(
        "Running benchmark {} [run id {run_id}] with {} thread(s), {} call(s) each",
        options.name,
        options.thread_count,
        options.measurement_count
    );

    let stop_handle = StopHandle::new();
    // Start the resource monitor to report high usage by the harness, which might lead to
    // misleading latencies.
    let monitor = start_monitor(stop_handle.new_listener())?;

    let planned_calls = (options.thread_count.max(1) * options.measurement_count) as u64;
    let progress = start_progress(planned_calls, options.no_progress);

    let outcomes = if options.thread_count <= 1 {
        Ok(vec![WorkerOutcome {
            thread_id: 0,
            result: single(&progress),
        }])
    } else {
        let worker_progress = progress.clone();
        run_workers(options.thread_count, move |thread_id, sender| {
            worker(thread_id, sender, &worker_progress)
        })
    };

    // The monitor must be stopped even when a worker panicked.
    progress.finish_and_clear();
    stop_handle.stop();
    if monitor.join().is_err() {
        log::warn!("Resource monitor thread panicked");
    }
    let outcomes = outcomes?;

    let report = RunReport {
        run_id,
        name: options.name.clone(),
        outcomes,
    };

    print_measurement_runs(&report.name, &report.runs());
    for (thread_id, e) in report.failures() {
        log::error!("Worker {thread_id} of benchmark {} failed: {e:?}", report.name);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::measure_with_progress;

    fn options(thread_count: usize) -> RunOptions {
        RunOptions {
            name: "unit".to_string(),
            thread_count,
            measurement_count: 2,
            pause: Duration::ZERO,
            no_progress: true,
        }
    }

    #[test]
    fn single_thread_uses_single_mode() {
        let report = run(
            &options(1),
            |progress| {
                measure_with_progress(|_| Ok(true), |ok| *ok, 2, Duration::ZERO, None, progress)
            },
            |_, _, _| panic!("worker must not run in single-threaded mode"),
        )
        .unwrap();

        assert!(report.is_success());
        assert_eq!(1, report.runs().len());
        assert_eq!(None, report.runs()[0].thread_id);
    }

    #[test]
    fn threaded_runs_are_ordered_by_thread() {
        let report = run(
            &options(3),
            |_| panic!("single mode must not run with several threads"),
            |thread_id, sender, progress| {
                let result = measure_with_progress(
                    |_| Ok(true),
                    |ok| *ok,
                    2,
                    Duration::ZERO,
                    Some(thread_id),
                    progress,
                );
                sender.send(WorkerOutcome { thread_id, result }).unwrap();
            },
        )
        .unwrap();

        let thread_ids = report.runs().iter().map(|r| r.thread_id).collect::<Vec<_>>();
        assert_eq!(vec![Some(1), Some(2), Some(3)], thread_ids);
        assert!(report.is_success());
    }

    #[test]
    fn failed_workers_are_reported() {
        let report = run(
            &options(2),
            |_| unreachable!(),
            |thread_id, sender, _| {
                sender
                    .send(WorkerOutcome {
                        thread_id,
                        result: Err(anyhow::anyhow!("boom")),
                    })
                    .unwrap();
            },
        )
        .unwrap();

        assert!(!report.is_success());
        assert_eq!(2, report.failures().count());
        assert!(report.runs().is_empty());
    }
}
