//! # framejob - Fixed-Size Worker-Thread Pool with Grouped Dispatch
//!
//! A worker-thread pool for latency-sensitive loops (simulation, rendering)
//! that need to fan out per-frame work without per-call thread creation.
//! Work is either submitted as single asynchronous jobs or as a ranged
//! workload partitioned into contiguous groups distributed across threads.
//!
//! ## Architecture
//!
//! - **Bounded job queue**: a fixed-capacity mutex-protected ring buffer of
//!   pending jobs; a full queue pushes back on submitters, never blocks.
//! - **Worker pool**: one long-lived thread per logical CPU (minimum one),
//!   each running a pop-execute-or-sleep loop.
//! - **Completion counters**: a submitted/completed pair makes "all work
//!   drained" observable without per-job bookkeeping.
//!
//! ## Example
//!
//! ```no_run
//! framejob::initialize();
//!
//! framejob::execute(|| {
//!     println!("hello from a worker");
//! });
//!
//! // Partition 1000 items into groups of 64, run groups in parallel.
//! framejob::dispatch(1000, 64, |args| {
//!     process(args.job_index);
//! });
//!
//! framejob::wait();
//! # fn process(_item: u32) {}
//! ```

pub mod global;
pub mod job;
pub mod job_system;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod queue;
pub mod topology;
mod worker;

use serde::{Deserialize, Serialize};

/// Strategy for pinning worker threads to CPU cores.
///
/// Pinning is applied once at thread creation and affects performance only,
/// never correctness; a pin that cannot be applied is logged and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PinningStrategy {
    /// No pinning (standard OS scheduling).
    #[default]
    None,
    /// Linear pinning (worker i -> logical processor i).
    Linear,
    /// Pin to even-numbered logical processors, avoiding SMT contention.
    AvoidSmt,
}

pub use global::{dispatch, execute, initialize, initialize_with_config, is_busy, wait};
pub use job::{DispatchArgs, Job};
pub use job_system::{JobSystem, JobSystemConfig};
pub use topology::Topology;
