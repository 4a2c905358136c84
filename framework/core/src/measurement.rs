use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single timed call made by a measurement loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Zero based index of the call within its loop.
    pub measurement_number: usize,
    /// Wall-clock time just before the call was made.
    pub started_at: DateTime<Utc>,
    /// Wall-clock time just after the call returned.
    pub finished_at: DateTime<Utc>,
    /// Elapsed time of the call, measured with a monotonic clock.
    pub delta: Duration,
}

/// Values produced by a measured call can carry a diagnostic payload that should be kept
/// alongside the timings.
///
/// The default implementation carries nothing.
pub trait DebugPayload {
    fn debug_payload(&self) -> Option<serde_json::Value> {
        None
    }
}

impl DebugPayload for () {}

impl DebugPayload for bool {}

impl DebugPayload for u16 {}

impl DebugPayload for serde_json::Value {
    fn debug_payload(&self) -> Option<serde_json::Value> {
        self.get("debug").cloned()
    }
}

/// Everything collected by one measurement loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRun {
    /// The worker thread that ran the loop, `None` when it ran in single-threaded mode.
    pub thread_id: Option<usize>,
    /// Measurements in the order the calls were made.
    pub measurements: Vec<Measurement>,
    /// Debug payloads extracted from call results, in call order.
    pub debug: Vec<serde_json::Value>,
    /// Number of call results rejected by the check function while running in threaded mode.
    ///
    /// Always zero in single-threaded mode, where a rejected result stops the loop instead.
    pub failed_checks: usize,
}

impl MeasurementRun {
    pub fn new(thread_id: Option<usize>) -> Self {
        Self {
            thread_id,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn total_delta(&self) -> Duration {
        self.measurements.iter().map(|m| m.delta).sum()
    }

    pub fn min_delta(&self) -> Option<Duration> {
        self.measurements.iter().map(|m| m.delta).min()
    }

    pub fn max_delta(&self) -> Option<Duration> {
        self.measurements.iter().map(|m| m.delta).max()
    }

    pub fn mean_delta(&self) -> Option<Duration> {
        if self.measurements.is_empty() {
            return None;
        }

        Some(self.total_delta() / self.measurements.len() as u32)
    }

    pub fn median_delta(&self) -> Option<Duration> {
        let mut deltas = self.measurements.iter().map(|m| m.delta).collect::<Vec<_>>();
        if deltas.is_empty() {
            return None;
        }
        deltas.sort();

        let mid = deltas.len() / 2;
        if deltas.len() % 2 == 0 {
            Some((deltas[mid - 1] + deltas[mid]) / 2)
        } else {
            Some(deltas[mid])
        }
    }
}
