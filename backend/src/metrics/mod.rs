//! Performance metrics derived from a finished run
//!
//! Scheduling metrics come from per-process completion and first-dispatch
//! times; paging metrics come from hit/fault counts. EDF extends the
//! scheduling set with deadline figures.
//!
//! Results expose metrics as a name → value map so presentation code can
//! tabulate any policy the same way. The map is ordered, so two identical
//! runs serialize identically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::Time;
use crate::models::process::Pid;

/// Metric name → value
pub type MetricMap = BTreeMap<String, f64>;

pub const AVERAGE_TURNAROUND_TIME: &str = "average_turnaround_time";
pub const AVERAGE_WAITING_TIME: &str = "average_waiting_time";
pub const AVERAGE_RESPONSE_TIME: &str = "average_response_time";
pub const THROUGHPUT: &str = "throughput";
pub const TOTAL_EXECUTION_TIME: &str = "total_execution_time";
pub const CPU_UTILIZATION: &str = "cpu_utilization";

pub const MISSED_DEADLINES: &str = "missed_deadlines";
pub const DEADLINE_MISS_RATIO: &str = "deadline_miss_ratio";
pub const SCHEDULABILITY: &str = "schedulability";

pub const TOTAL_REFERENCES: &str = "total_references";
pub const PAGE_FAULTS: &str = "page_faults";
pub const PAGE_HITS: &str = "page_hits";
pub const HIT_RATIO: &str = "hit_ratio";
pub const FAULT_RATIO: &str = "fault_ratio";

/// Whether a smaller value of the named metric is the better outcome
///
/// Unknown names are treated as lower-is-better.
pub fn lower_is_better(metric: &str) -> bool {
    !matches!(
        metric,
        THROUGHPUT | CPU_UTILIZATION | SCHEDULABILITY | PAGE_HITS | HIT_RATIO
    )
}

/// Per-process outcome of a scheduling run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStats {
    pub pid: Pid,
    pub arrival_time: Time,
    pub burst_time: Time,
    pub completion_time: Time,
    pub first_dispatch: Time,
    pub turnaround_time: Time,
    pub waiting_time: Time,
    pub response_time: Time,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Time>,
}

impl ProcessStats {
    pub fn new(
        pid: Pid,
        arrival_time: Time,
        burst_time: Time,
        completion_time: Time,
        first_dispatch: Time,
        deadline: Option<Time>,
    ) -> Self {
        let turnaround_time = completion_time.saturating_sub(arrival_time);
        Self {
            pid,
            arrival_time,
            burst_time,
            completion_time,
            first_dispatch,
            turnaround_time,
            waiting_time: turnaround_time.saturating_sub(burst_time),
            response_time: first_dispatch.saturating_sub(arrival_time),
            deadline,
        }
    }

    /// Completed after the deadline (`false` without a deadline)
    pub fn missed_deadline(&self) -> bool {
        self.deadline
            .map(|deadline| self.completion_time > deadline)
            .unwrap_or(false)
    }
}

/// Aggregate scheduling metrics shared by every policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingMetrics {
    pub average_turnaround_time: f64,
    pub average_waiting_time: f64,
    pub average_response_time: f64,
    pub throughput: f64,
    pub total_execution_time: Time,
    pub cpu_utilization: f64,
}

impl SchedulingMetrics {
    /// Aggregate per-process outcomes; `None` for an empty run
    ///
    /// # Example
    /// ```
    /// use os_simulator_core_rs::metrics::{ProcessStats, SchedulingMetrics};
    ///
    /// let stats = vec![
    ///     ProcessStats::new(1, 0, 5, 5, 0, None),
    ///     ProcessStats::new(2, 1, 3, 8, 5, None),
    /// ];
    /// let m = SchedulingMetrics::from_stats(&stats).unwrap();
    /// assert_eq!(m.average_waiting_time, 2.0);
    /// assert_eq!(m.total_execution_time, 8);
    /// ```
    pub fn from_stats(stats: &[ProcessStats]) -> Option<Self> {
        if stats.is_empty() {
            return None;
        }

        let count = stats.len() as f64;
        let mean = |f: fn(&ProcessStats) -> Time| {
            stats.iter().map(|s| f(s) as f64).sum::<f64>() / count
        };

        let total_execution_time = stats.iter().map(|s| s.completion_time).max().unwrap_or(0);
        let total_burst: Time = stats.iter().map(|s| s.burst_time).sum();
        let (throughput, cpu_utilization) = if total_execution_time > 0 {
            (
                count / total_execution_time as f64,
                total_burst as f64 / total_execution_time as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Some(Self {
            average_turnaround_time: mean(|s| s.turnaround_time),
            average_waiting_time: mean(|s| s.waiting_time),
            average_response_time: mean(|s| s.response_time),
            throughput,
            total_execution_time,
            cpu_utilization,
        })
    }

    pub fn write_into(&self, map: &mut MetricMap) {
        map.insert(AVERAGE_TURNAROUND_TIME.to_string(), self.average_turnaround_time);
        map.insert(AVERAGE_WAITING_TIME.to_string(), self.average_waiting_time);
        map.insert(AVERAGE_RESPONSE_TIME.to_string(), self.average_response_time);
        map.insert(THROUGHPUT.to_string(), self.throughput);
        map.insert(TOTAL_EXECUTION_TIME.to_string(), self.total_execution_time as f64);
        map.insert(CPU_UTILIZATION.to_string(), self.cpu_utilization);
    }
}

/// EDF deadline figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineMetrics {
    pub missed_deadlines: usize,
    pub deadline_miss_ratio: f64,
    pub schedulability: f64,
}

impl DeadlineMetrics {
    pub fn new(missed_deadlines: usize, process_count: usize) -> Self {
        let deadline_miss_ratio = if process_count > 0 {
            missed_deadlines as f64 / process_count as f64
        } else {
            0.0
        };
        Self {
            missed_deadlines,
            deadline_miss_ratio,
            schedulability: 1.0 - deadline_miss_ratio,
        }
    }

    pub fn write_into(&self, map: &mut MetricMap) {
        map.insert(MISSED_DEADLINES.to_string(), self.missed_deadlines as f64);
        map.insert(DEADLINE_MISS_RATIO.to_string(), self.deadline_miss_ratio);
        map.insert(SCHEDULABILITY.to_string(), self.schedulability);
    }
}

/// Page replacement metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagingMetrics {
    pub total_references: usize,
    pub page_faults: usize,
    pub page_hits: usize,
    pub hit_ratio: f64,
    pub fault_ratio: f64,
}

impl PagingMetrics {
    /// # Example
    /// ```
    /// use os_simulator_core_rs::metrics::PagingMetrics;
    ///
    /// let m = PagingMetrics::new(20, 15);
    /// assert_eq!(m.page_hits, 5);
    /// assert_eq!(m.hit_ratio, 0.25);
    /// ```
    pub fn new(total_references: usize, page_faults: usize) -> Self {
        let page_hits = total_references.saturating_sub(page_faults);
        let (hit_ratio, fault_ratio) = if total_references > 0 {
            let total = total_references as f64;
            (page_hits as f64 / total, page_faults as f64 / total)
        } else {
            (0.0, 0.0)
        };
        Self {
            total_references,
            page_faults,
            page_hits,
            hit_ratio,
            fault_ratio,
        }
    }

    pub fn write_into(&self, map: &mut MetricMap) {
        map.insert(TOTAL_REFERENCES.to_string(), self.total_references as f64);
        map.insert(PAGE_FAULTS.to_string(), self.page_faults as f64);
        map.insert(PAGE_HITS.to_string(), self.page_hits as f64);
        map.insert(HIT_RATIO.to_string(), self.hit_ratio);
        map.insert(FAULT_RATIO.to_string(), self.fault_ratio);
    }
}
