use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use serde::{Deserialize, Serialize};

/// Counters for a single process. Created on a process's first reference
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct ProcessStats {
    pub total_references: u64,
    pub tlb_misses: u64,
    pub page_faults: u64,
    pub clean_evictions: u64,
    pub dirty_evictions: u64,
}

impl ProcessStats {
    pub fn total_evictions(&self) -> u64 {
        self.clean_evictions + self.dirty_evictions
    }

    /// Share of evictions which had to write a dirty page back, as a percentage
    ///
    /// Zero when nothing was evicted. For an aggregate, sum the stats first and then ask; averaging
    /// the per-process percentages gives a different number
    pub fn dirty_eviction_pct(&self) -> f64 {
        let total = self.total_evictions();
        if total == 0 {
            return 0.0;
        }
        self.dirty_evictions as f64 / total as f64 * 100.0
    }
}

impl Add for ProcessStats {
    type Output = ProcessStats;

    fn add(self, rhs: Self) -> Self::Output {
        ProcessStats {
            total_references: self.total_references + rhs.total_references,
            tlb_misses: self.tlb_misses + rhs.tlb_misses,
            page_faults: self.page_faults + rhs.page_faults,
            clean_evictions: self.clean_evictions + rhs.clean_evictions,
            dirty_evictions: self.dirty_evictions + rhs.dirty_evictions,
        }
    }
}

impl AddAssign for ProcessStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for ProcessStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(ProcessStats::default(), Add::add)
    }
}

impl<'a> Sum<&'a ProcessStats> for ProcessStats {
    fn sum<I: Iterator<Item = &'a ProcessStats>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// The result of a simulation. Can be serialised to JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct SimulationResult {
    pub total_latency: u64,
    pub total_accesses: u64,
    pub processes: BTreeMap<u32, ProcessStats>,
    /// Sum over every process, refreshed when a simulation run ends
    pub overall: ProcessStats,
}

impl SimulationResult {
    /// Recomputes the overall stats from the per-process stats
    pub(crate) fn aggregate(&mut self) {
        self.overall = self.processes.values().sum();
    }
}
