//! Worker thread implementation.
//!
//! Worker threads continuously pull jobs from the shared bounded queue and
//! execute them, bumping the completed counter after each one. When the
//! queue is empty they sleep on a shared condition variable until a
//! submitter signals new work.

use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, trace, warn};

use crate::job::Job;
use crate::queue::BoundedQueue;
use crate::topology::Topology;
use crate::PinningStrategy;

/// State shared between submitters and every worker thread. This is the
/// only shared mutable state in the system.
pub(crate) struct Shared {
    /// Pending jobs. Fixed capacity; a full queue pushes back on submitters.
    pub(crate) queue: BoundedQueue<Job>,
    /// Units of work promised by submitters. Monotonically non-decreasing,
    /// never reset.
    pub(crate) submitted: AtomicU64,
    /// Units of work finished by workers. At any instant
    /// `completed <= submitted`; the pool is idle iff they are equal.
    pub(crate) completed: AtomicU64,
    /// Set once at shutdown; workers observe it only when the queue is empty.
    terminate: AtomicBool,
    wake_mutex: Mutex<()>,
    wake_cond: Condvar,
    #[cfg(feature = "metrics")]
    pub(crate) metrics: crate::metrics::Metrics,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Shared {
            queue: BoundedQueue::new(),
            submitted: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            terminate: AtomicBool::new(false),
            wake_mutex: Mutex::new(()),
            wake_cond: Condvar::new(),
            #[cfg(feature = "metrics")]
            metrics: crate::metrics::Metrics::new(),
        }
    }

    /// Wakes one sleeping worker.
    ///
    /// The wake mutex is taken first: a worker between its failed pop and
    /// its condvar wait holds the same mutex for its emptiness re-check, so
    /// the signal cannot fall into that window and be lost.
    pub(crate) fn signal_one(&self) {
        let _guard = self.wake_mutex.lock().unwrap();
        self.wake_cond.notify_one();
    }

    /// Wakes every sleeping worker.
    pub(crate) fn signal_all(&self) {
        let _guard = self.wake_mutex.lock().unwrap();
        self.wake_cond.notify_all();
    }
}

/// A worker thread that executes jobs from the shared queue.
pub(crate) struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawns a named worker thread, optionally pinned to a logical CPU.
    fn spawn(id: usize, shared: Arc<Shared>, pin_to: Option<usize>) -> Self {
        let handle = thread::Builder::new()
            .name(format!("framejob-{id}"))
            .spawn(move || {
                if let Some(cpu) = pin_to {
                    apply_affinity(id, cpu);
                }
                trace!(worker = id, "worker started");
                Worker::run_loop(&shared);
                trace!(worker = id, "worker stopped");
            })
            .expect("failed to spawn worker thread");

        Worker {
            id,
            handle: Some(handle),
        }
    }

    /// Main pop-execute-or-sleep loop.
    fn run_loop(shared: &Shared) {
        loop {
            match shared.queue.pop_front() {
                Some(job) => {
                    run_job(job);
                    shared.completed.fetch_add(1, Ordering::SeqCst);
                }
                None => {
                    if shared.terminate.load(Ordering::Acquire) {
                        break;
                    }
                    let guard = shared.wake_mutex.lock().unwrap();
                    // Re-check with the lock held: submitters signal under
                    // the same lock, so a push that landed after the failed
                    // pop is seen here instead of being slept through.
                    if shared.queue.is_empty() && !shared.terminate.load(Ordering::Acquire) {
                        let _guard = shared.wake_cond.wait(guard).unwrap();
                    }
                }
            }
        }
    }

    fn id(&self) -> usize {
        self.id
    }

    /// Waits for the worker thread to finish.
    fn join(mut self) -> thread::Result<()> {
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}

/// Runs one job to completion on the current thread.
///
/// A panic escaping the job is logged and aborts the process: a silently
/// dead worker would leave the completed counter permanently behind the
/// submitted counter and deadlock every waiter.
fn run_job(job: Job) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| job.run())) {
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic payload>");
        error!(message, "job panicked; aborting");
        process::abort();
    }
}

/// Pins the current thread to `cpu`. Failure is logged and ignored; pinning
/// affects performance only, never correctness.
fn apply_affinity(worker: usize, cpu: usize) {
    let Some(core_ids) = core_affinity::get_core_ids() else {
        warn!(worker, cpu, "core enumeration failed; worker left unpinned");
        return;
    };
    match core_ids.into_iter().find(|core| core.id == cpu) {
        Some(core) => {
            if core_affinity::set_for_current(core) {
                trace!(worker, cpu, "worker pinned");
            } else {
                warn!(worker, cpu, "failed to pin worker; left unpinned");
            }
        }
        None => warn!(worker, cpu, "logical cpu not available; worker left unpinned"),
    }
}

/// A fixed-size pool of worker threads.
///
/// Threads are created once and run for the lifetime of the pool; there is
/// no resizing. Owned pools may be torn down with [`WorkerPool::shutdown`];
/// the process-global pool never is.
pub(crate) struct WorkerPool {
    workers: Vec<Worker>,
    shared: Arc<Shared>,
}

impl WorkerPool {
    /// Creates the pool and starts every worker immediately.
    pub(crate) fn new(
        num_threads: usize,
        strategy: PinningStrategy,
        shared: Arc<Shared>,
    ) -> Self {
        let plan = if strategy == PinningStrategy::None {
            vec![None; num_threads]
        } else {
            Topology::detect().pinning_plan(strategy, num_threads)
        };
        debug!(num_threads, ?strategy, "starting worker pool");

        let workers = plan
            .into_iter()
            .enumerate()
            .map(|(id, pin_to)| Worker::spawn(id, Arc::clone(&shared), pin_to))
            .collect();

        WorkerPool { workers, shared }
    }

    /// Returns the number of worker threads in the pool.
    pub(crate) fn size(&self) -> usize {
        self.workers.len()
    }

    /// Signals termination and joins every worker.
    ///
    /// Callers drain the queue first; workers only observe the terminate
    /// flag once the queue is empty, so no accepted work is lost. Returns
    /// the number of workers that panicked, if any.
    pub(crate) fn shutdown(self) -> Result<(), usize> {
        self.shared.terminate.store(true, Ordering::Release);
        self.shared.signal_all();

        let mut failed = 0;
        for worker in self.workers {
            let id = worker.id();
            if worker.join().is_err() {
                failed += 1;
                error!(worker = id, "worker panicked during execution");
            }
        }

        if failed > 0 {
            Err(failed)
        } else {
            Ok(())
        }
    }
}
