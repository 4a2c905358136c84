use analysis_probe_core::prelude::MeasurementRun;
use anyhow::Context;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;

/// What a worker thread sends back to the thread that spawned it.
#[derive(Debug)]
pub struct WorkerOutcome {
    pub thread_id: usize,
    pub result: anyhow::Result<MeasurementRun>,
}

/// Run `worker` on `thread_count` dedicated threads and collect what they send.
///
/// Each worker receives its thread id, starting from 1, and a sender for the shared result
/// channel. Workers share nothing else. This function blocks until every worker thread has
/// finished and only then drains the channel, so the returned outcomes are complete but in the
/// order the workers sent them.
///
/// A worker thread that panics is reported as an error once all threads have been joined.
pub fn run_workers<F>(thread_count: usize, worker: F) -> anyhow::Result<Vec<WorkerOutcome>>
where
    F: Fn(usize, Sender<WorkerOutcome>) + Send + Sync + 'static,
{
    let worker = Arc::new(worker);
    let (sender, receiver) = mpsc::channel();

    let mut handles = Vec::with_capacity(thread_count);
    for thread_id in 1..=thread_count {
        let worker = worker.clone();
        let sender = sender.clone();

        handles.push(
            std::thread::Builder::new()
                .name(format!("worker-{thread_id}"))
                .spawn(move || worker(thread_id, sender))
                .context("Failed to spawn worker thread")?,
        );
    }
    // Only the workers hold senders from here on, so the channel closes when the last one exits.
    drop(sender);

    log::debug!("Started {thread_count} worker threads");

    let mut panicked = 0;
    for handle in handles {
        if let Err(e) = handle.join() {
            log::error!("Error joining worker thread: {:?}", e);
            panicked += 1;
        }
    }

    if panicked > 0 {
        anyhow::bail!("{panicked} of {thread_count} worker threads panicked");
    }

    Ok(receiver.try_iter().collect())
}
