//! High-level job system interface.
//!
//! The `JobSystem` is the entry point for scheduling parallel work: submit
//! single jobs with [`JobSystem::execute`], fan a ranged workload out across
//! the pool with [`JobSystem::dispatch`], and observe completion with
//! [`JobSystem::is_busy`] and [`JobSystem::wait`].
//!
//! Completion is tracked by two counters instead of per-job bookkeeping:
//! submitters bump `submitted` once per queued unit, workers bump
//! `completed` once per finished unit, and the pool is idle exactly when
//! the two are equal.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::job::{DispatchArgs, Job};
use crate::worker::{Shared, WorkerPool};
use crate::PinningStrategy;

/// Configuration for a [`JobSystem`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSystemConfig {
    /// Number of worker threads. `None` uses the detected hardware
    /// parallelism, with a minimum of one.
    pub num_threads: Option<usize>,
    /// How worker threads are pinned to CPU cores.
    pub pinning: PinningStrategy,
}

/// A fixed-size worker-thread pool with grouped dispatch.
///
/// Worker threads are created once at construction and run until the system
/// is shut down (owned instances) or the process exits (the global pool).
///
/// # Example
///
/// ```no_run
/// use framejob::JobSystem;
///
/// let system = JobSystem::new(4);
/// system.execute(|| {
///     println!("hello from a worker");
/// });
/// system.wait();
/// system.shutdown().expect("shutdown failed");
/// ```
pub struct JobSystem {
    shared: Arc<Shared>,
    pool: WorkerPool,
}

impl JobSystem {
    /// Creates a job system with the specified number of worker threads
    /// (minimum one).
    pub fn new(num_threads: usize) -> Self {
        Self::with_config(JobSystemConfig {
            num_threads: Some(num_threads),
            ..JobSystemConfig::default()
        })
    }

    /// Creates a job system from a configuration.
    pub fn with_config(config: JobSystemConfig) -> Self {
        let num_threads = config
            .num_threads
            .unwrap_or_else(detected_parallelism)
            .max(1);
        let shared = Arc::new(Shared::new());
        let pool = WorkerPool::new(num_threads, config.pinning, Arc::clone(&shared));
        JobSystem { shared, pool }
    }

    /// Adds a job to execute asynchronously. Any idle worker will pick it
    /// up; there is no affinity between a job and a specific thread.
    ///
    /// If the queue is full, this backs off and retries until the job is
    /// enqueued; the job is enqueued exactly once.
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // The promise is recorded before the job becomes visible to workers
        // so `is_busy` can never report a false idle in between.
        self.shared.submitted.fetch_add(1, Ordering::SeqCst);
        self.enqueue(Job::new(job));
    }

    /// Divides a ranged workload into groups and executes them in parallel.
    ///
    /// Generates `ceil(job_count / group_size)` groups, each covering a
    /// contiguous slice of `[0, job_count)`. Every index appears in exactly
    /// one group; inside a group, indices run serially in increasing order
    /// on a single worker. Groups may run concurrently and in any relative
    /// order. The callback receives a [`DispatchArgs`] per index.
    ///
    /// Does nothing if `job_count` or `group_size` is zero.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use framejob::JobSystem;
    /// # let data: Vec<f32> = vec![0.0; 1000];
    ///
    /// let system = JobSystem::new(4);
    /// system.dispatch(1000, 64, move |args| {
    ///     let _item = data[args.job_index as usize];
    ///     // process one item
    /// });
    /// system.wait();
    /// ```
    pub fn dispatch<F>(&self, job_count: u32, group_size: u32, job: F)
    where
        F: Fn(DispatchArgs) + Send + Sync + 'static,
    {
        if job_count == 0 || group_size == 0 {
            return;
        }

        let group_count = job_count.div_ceil(group_size);
        self.shared
            .submitted
            .fetch_add(u64::from(group_count), Ordering::SeqCst);
        #[cfg(feature = "metrics")]
        self.shared
            .metrics
            .groups_dispatched
            .fetch_add(u64::from(group_count), Ordering::Relaxed);

        // The callback is shared by reference count; each group closure owns
        // its range by value, so concurrent groups contend on nothing.
        let job = Arc::new(job);
        for group_index in 0..group_count {
            let job = Arc::clone(&job);
            self.enqueue(Job::new(move || {
                let offset = group_index * group_size;
                let end = (offset + group_size).min(job_count);
                for job_index in offset..end {
                    job(DispatchArgs {
                        job_index,
                        group_index,
                    });
                }
            }));
        }
    }

    /// Returns true while any submitted work has not finished.
    ///
    /// A cheap lock-free snapshot; it may be momentarily stale, but since
    /// the completed counter only increases, a `false` answer means every
    /// unit submitted before the call has finished.
    pub fn is_busy(&self) -> bool {
        self.shared.completed.load(Ordering::SeqCst) < self.shared.submitted.load(Ordering::SeqCst)
    }

    /// Blocks the calling thread until every submitted unit has finished.
    ///
    /// Keeps nudging a worker and yielding between checks rather than
    /// spinning, so an oversubscribed system still makes progress.
    pub fn wait(&self) {
        while self.is_busy() {
            self.poll();
        }
    }

    /// Returns the number of worker threads in the system.
    pub fn num_workers(&self) -> usize {
        self.pool.size()
    }

    /// Returns a snapshot of scheduler activity.
    #[cfg(feature = "metrics")]
    pub fn metrics(&self) -> crate::metrics::MetricsSnapshot {
        // Completed is read first; both counters only grow and completed
        // never passes submitted, so the snapshot cannot show more finished
        // than promised.
        let completed = self.shared.completed.load(Ordering::SeqCst);
        let submitted = self.shared.submitted.load(Ordering::SeqCst);
        self.shared.metrics.snapshot(submitted, completed)
    }

    /// Drains all submitted work, then stops and joins every worker.
    ///
    /// Returns Err if any worker thread panicked.
    pub fn shutdown(self) -> Result<(), String> {
        self.wait();
        debug!("shutting down job system");
        self.pool
            .shutdown()
            .map_err(|count| format!("{count} worker thread(s) panicked"))
    }

    /// Pushes one queue item, backing off with [`Self::poll`] while the
    /// queue is full, then wakes a worker for it.
    fn enqueue(&self, mut job: Job) {
        while let Err(returned) = self.shared.queue.push_back(job) {
            job = returned;
            #[cfg(feature = "metrics")]
            self.shared
                .metrics
                .queue_full_retries
                .fetch_add(1, Ordering::Relaxed);
            self.poll();
        }
        self.shared.signal_one();
    }

    /// Wakes one sleeping worker and yields the rest of this thread's time
    /// slice. Used while waiting for queue space or for completion, so a
    /// caller blocked on a fully subscribed system never starves the
    /// workers of CPU time.
    fn poll(&self) {
        self.shared.signal_one();
        thread::yield_now();
    }
}

impl Default for JobSystem {
    /// A job system with one worker per detected logical CPU, unpinned.
    fn default() -> Self {
        Self::with_config(JobSystemConfig::default())
    }
}

fn detected_parallelism() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
