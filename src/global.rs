//! Process-global job system.
//!
//! Mirrors the [`JobSystem`] API as free functions over a single
//! process-wide pool: call [`initialize`] once at startup, then submit work
//! from anywhere. The global pool lives for the remainder of the process;
//! it is never joined or torn down.

use std::sync::OnceLock;

use crate::job::DispatchArgs;
use crate::job_system::{JobSystem, JobSystemConfig};

static JOB_SYSTEM: OnceLock<JobSystem> = OnceLock::new();

/// Creates the global worker pool, sized to the detected hardware
/// parallelism. Call it once when initializing the application, before any
/// other global operation.
///
/// # Panics
///
/// Panics if the global pool is already initialized.
pub fn initialize() {
    initialize_with_config(JobSystemConfig::default());
}

/// Like [`initialize`], with an explicit configuration.
///
/// # Panics
///
/// Panics if the global pool is already initialized.
pub fn initialize_with_config(config: JobSystemConfig) {
    if JOB_SYSTEM.set(JobSystem::with_config(config)).is_err() {
        panic!("framejob: the global job system is already initialized");
    }
}

fn system() -> &'static JobSystem {
    JOB_SYSTEM
        .get()
        .expect("framejob: call initialize() before submitting work")
}

/// Adds a job to execute asynchronously on the global pool. Any idle worker
/// will pick it up. See [`JobSystem::execute`].
pub fn execute<F>(job: F)
where
    F: FnOnce() + Send + 'static,
{
    system().execute(job);
}

/// Divides a ranged workload into groups and executes them in parallel on
/// the global pool. See [`JobSystem::dispatch`].
pub fn dispatch<F>(job_count: u32, group_size: u32, job: F)
where
    F: Fn(DispatchArgs) + Send + Sync + 'static,
{
    system().dispatch(job_count, group_size, job);
}

/// Returns true while any work submitted to the global pool has not
/// finished. See [`JobSystem::is_busy`].
pub fn is_busy() -> bool {
    system().is_busy()
}

/// Blocks until every unit submitted to the global pool has finished. See
/// [`JobSystem::wait`].
pub fn wait() {
    system().wait();
}

/// Returns the number of worker threads in the global pool.
pub fn num_workers() -> usize {
    system().num_workers()
}
