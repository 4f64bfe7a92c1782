//! Optional scheduler activity metrics, enabled with the `metrics` feature.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Internal counters updated on the scheduling hot paths.
#[derive(Debug)]
pub(crate) struct Metrics {
    /// Dispatch groups generated across all `dispatch` calls.
    pub(crate) groups_dispatched: AtomicU64,
    /// Push attempts that found the queue full and had to back off.
    pub(crate) queue_full_retries: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Metrics {
            groups_dispatched: AtomicU64::new(0),
            queue_full_retries: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub(crate) fn snapshot(&self, submitted: u64, completed: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            submitted,
            completed,
            groups_dispatched: self.groups_dispatched.load(Ordering::Relaxed),
            queue_full_retries: self.queue_full_retries.load(Ordering::Relaxed),
            elapsed_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }
}

/// Snapshot of scheduler activity at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    /// Units of work promised by submitters so far.
    pub submitted: u64,
    /// Units of work finished by workers so far.
    pub completed: u64,
    /// Dispatch groups generated across all `dispatch` calls.
    pub groups_dispatched: u64,
    /// Push attempts that found the queue full and had to back off.
    pub queue_full_retries: u64,
    /// Seconds since the system was created.
    pub elapsed_seconds: f64,
}

impl MetricsSnapshot {
    /// Units currently submitted but not yet finished.
    pub fn in_flight(&self) -> u64 {
        self.submitted - self.completed
    }

    /// Completed units per second since the system was created.
    pub fn jobs_per_second(&self) -> f64 {
        if self.elapsed_seconds > 0.0 {
            self.completed as f64 / self.elapsed_seconds
        } else {
            0.0
        }
    }
}
