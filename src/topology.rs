//! CPU topology detection for worker pinning plans.

use sysinfo::{CpuRefreshKind, System};

use crate::PinningStrategy;

/// A snapshot of the host's CPU layout.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Number of logical processors visible to the process.
    pub logical_cpus: usize,
    /// Number of physical cores, falling back to the logical count when the
    /// platform does not expose it.
    pub physical_cores: usize,
}

impl Topology {
    /// Detects the host topology.
    pub fn detect() -> Self {
        let mut system = System::new();
        system.refresh_cpu_specifics(CpuRefreshKind::everything());

        let logical_cpus = system.cpus().len().max(1);
        let physical_cores = system.physical_core_count().unwrap_or(logical_cpus);

        Topology {
            logical_cpus,
            physical_cores,
        }
    }

    /// Computes the logical CPU each worker should be pinned to, or `None`
    /// where the strategy leaves a worker unpinned.
    ///
    /// `Linear` maps worker i to logical CPU i; workers beyond the last CPU
    /// stay unpinned. `AvoidSmt` maps workers onto even-numbered logical
    /// CPUs, skipping the SMT siblings that most hosts enumerate as odd ids.
    pub fn pinning_plan(
        &self,
        strategy: PinningStrategy,
        num_threads: usize,
    ) -> Vec<Option<usize>> {
        (0..num_threads)
            .map(|worker| match strategy {
                PinningStrategy::None => None,
                PinningStrategy::Linear => (worker < self.logical_cpus).then_some(worker),
                PinningStrategy::AvoidSmt => {
                    let cpu = worker * 2;
                    (cpu < self.logical_cpus).then_some(cpu)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_topology(logical_cpus: usize) -> Topology {
        Topology {
            logical_cpus,
            physical_cores: logical_cpus / 2,
        }
    }

    #[test]
    fn test_detect_reports_at_least_one_cpu() {
        let topology = Topology::detect();
        assert!(topology.logical_cpus >= 1);
        assert!(topology.physical_cores >= 1);
    }

    #[test]
    fn test_none_strategy_leaves_all_unpinned() {
        let plan = fake_topology(8).pinning_plan(PinningStrategy::None, 4);
        assert_eq!(plan, vec![None; 4]);
    }

    #[test]
    fn test_linear_strategy_maps_one_to_one() {
        let plan = fake_topology(4).pinning_plan(PinningStrategy::Linear, 6);
        assert_eq!(
            plan,
            vec![Some(0), Some(1), Some(2), Some(3), None, None]
        );
    }

    #[test]
    fn test_avoid_smt_strategy_uses_even_cpus() {
        let plan = fake_topology(8).pinning_plan(PinningStrategy::AvoidSmt, 6);
        assert_eq!(
            plan,
            vec![Some(0), Some(2), Some(4), Some(6), None, None]
        );
    }
}
