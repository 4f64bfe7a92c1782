//! Job definitions.
//!
//! Jobs are opaque units of work executed by the worker pool. A dispatched
//! group invokes its callback once per logical index, passing `DispatchArgs`.

/// Argument passed to a dispatched callback, once per logical index.
///
/// Values are valid only for the duration of the single invocation; the pool
/// never stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchArgs {
    /// Index of the current item within the whole dispatched range.
    pub job_index: u32,
    /// Index of the group this invocation belongs to.
    pub group_index: u32,
}

/// A unit of work to be executed by the worker pool.
///
/// Once enqueued, the queue slot owns the job; the submitting caller retains
/// no reference and must not assume any particular execution time.
pub struct Job {
    work: Box<dyn FnOnce() + Send + 'static>,
}

impl Job {
    /// Creates a new job from the given work function.
    pub fn new<F>(work: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Job {
            work: Box::new(work),
        }
    }

    /// Executes the job, consuming it.
    pub fn run(self) {
        (self.work)();
    }
}
