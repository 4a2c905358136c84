use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Signals auxiliary threads (progress display, resource monitor) that the workers they observe
/// have finished.
///
/// Measurement loops never listen to this handle; a worker always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            log::debug!("Stop requested more than once");
        }
    }

    pub fn new_listener(&self) -> StopListener {
        StopListener {
            stopped: self.stopped.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StopListener {
    stopped: Arc<AtomicBool>,
}

impl StopListener {
    /// Point in time check of whether the owning handle has been stopped.
    pub fn should_stop(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
