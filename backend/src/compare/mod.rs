//! Policy comparison
//!
//! Engines never talk to each other. These helpers run independent engines
//! on related inputs and put the results side by side:
//!
//! - **Duel**: two policies of the same kind on identical input, judged by
//!   one metric
//! - **Hybrid**: one scheduler over the processes, plus one replacement
//!   policy over each process's own page references

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SimulationError;
use crate::metrics::{lower_is_better, AVERAGE_WAITING_TIME};
use crate::models::{PageNumber, Pid, Process, SimulationResult};
use crate::paging::PagingAlgorithm;
use crate::scheduling::SchedulerConfig;

/// Which side of a duel came out ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Left,
    Right,
    Tie,
}

/// Two results on identical input and the verdict for `metric`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelReport {
    pub metric: String,
    pub left: SimulationResult,
    pub right: SimulationResult,
    pub verdict: Verdict,
}

impl DuelReport {
    fn judge(
        metric: &str,
        left: SimulationResult,
        right: SimulationResult,
    ) -> Result<Self, SimulationError> {
        let verdict = if left.metrics().is_empty() && right.metrics().is_empty() {
            // Empty input: nothing to compare
            Verdict::Tie
        } else {
            let value = |result: &SimulationResult| {
                result.metric(metric).ok_or_else(|| {
                    SimulationError::InvalidConfig(format!(
                        "{} does not report metric '{}'",
                        result.algorithm_name(),
                        metric
                    ))
                })
            };
            let (a, b) = (value(&left)?, value(&right)?);
            let (a, b) = if lower_is_better(metric) { (a, b) } else { (b, a) };
            if a < b {
                Verdict::Left
            } else if b < a {
                Verdict::Right
            } else {
                Verdict::Tie
            }
        };

        log::debug!(
            "duel on {}: {} vs {} -> {:?}",
            metric,
            left.algorithm_name(),
            right.algorithm_name(),
            verdict
        );

        Ok(Self {
            metric: metric.to_string(),
            left,
            right,
            verdict,
        })
    }

    /// The better result, `None` on a tie
    pub fn winner(&self) -> Option<&SimulationResult> {
        match self.verdict {
            Verdict::Left => Some(&self.left),
            Verdict::Right => Some(&self.right),
            Verdict::Tie => None,
        }
    }
}

/// Run two schedulers on the same processes and compare one metric
///
/// # Example
/// ```
/// use os_simulator_core_rs::compare::{duel_scheduling, Verdict};
/// use os_simulator_core_rs::models::Process;
/// use os_simulator_core_rs::scheduling::{Preemption, SchedulerConfig};
///
/// let processes = vec![
///     Process::new(1, 0, 5).unwrap(),
///     Process::new(2, 1, 3).unwrap(),
///     Process::new(3, 2, 8).unwrap(),
///     Process::new(4, 3, 6).unwrap(),
/// ];
/// let sjf = SchedulerConfig::Sjf { preemption: Preemption::NonPreemptive };
/// let report = duel_scheduling(&SchedulerConfig::Fcfs, &sjf, &processes, "average_waiting_time")
///     .unwrap();
///
/// assert_eq!(report.verdict, Verdict::Right);
/// ```
pub fn duel_scheduling(
    left: &SchedulerConfig,
    right: &SchedulerConfig,
    processes: &[Process],
    metric: &str,
) -> Result<DuelReport, SimulationError> {
    let left = left.execute(processes)?;
    let right = right.execute(processes)?;
    DuelReport::judge(metric, left, right)
}

/// Run two replacement policies on the same reference string
pub fn duel_paging(
    left: PagingAlgorithm,
    right: PagingAlgorithm,
    page_sequence: &[PageNumber],
    frame_count: usize,
    metric: &str,
) -> Result<DuelReport, SimulationError> {
    let left = left.execute(page_sequence, frame_count)?;
    let right = right.execute(page_sequence, frame_count)?;
    DuelReport::judge(metric, left, right)
}

// ============================================================================
// Hybrid workload
// ============================================================================

/// Outcome of scheduling a workload and paging each process's references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridReport {
    pub schedule: SimulationResult,
    pub paging_algorithm: PagingAlgorithm,
    pub frame_count: usize,
    /// Faults per process; processes without page references are absent
    pub page_faults: BTreeMap<Pid, usize>,
    pub total_page_faults: usize,
    /// 100 minus the average waiting time
    pub cpu_efficiency: f64,
    /// 100 minus five points per page fault
    pub memory_efficiency: f64,
    /// Mean of the CPU and memory efficiencies
    pub efficiency_score: f64,
}

/// Schedule `processes`, then replay each process's `memory_pages` in its
/// own frame pool of `frame_count` frames
///
/// Efficiency figures are unclamped and can go negative for heavy
/// workloads.
pub fn run_hybrid(
    scheduler: &SchedulerConfig,
    paging_algorithm: PagingAlgorithm,
    processes: &[Process],
    frame_count: usize,
) -> Result<HybridReport, SimulationError> {
    if frame_count == 0 {
        return Err(SimulationError::InvalidConfig(
            "frame_count must be > 0".to_string(),
        ));
    }

    let schedule = scheduler.execute(processes)?;
    let policy = paging_algorithm.build();

    let mut page_faults = BTreeMap::new();
    for process in processes.iter().filter(|p| !p.memory_pages().is_empty()) {
        let paging = policy.execute(process.memory_pages(), frame_count)?;
        page_faults.insert(process.pid(), paging.trace().faults().len());
    }
    let total_page_faults: usize = page_faults.values().sum();

    let cpu_efficiency = 100.0 - schedule.metric(AVERAGE_WAITING_TIME).unwrap_or(0.0);
    let memory_efficiency = 100.0 - 5.0 * total_page_faults as f64;
    let efficiency_score = (cpu_efficiency + memory_efficiency) / 2.0;

    log::debug!(
        "hybrid {} + {}: {} faults, score {:.2}",
        schedule.algorithm_name(),
        policy.name(),
        total_page_faults,
        efficiency_score
    );

    Ok(HybridReport {
        schedule,
        paging_algorithm,
        frame_count,
        page_faults,
        total_page_faults,
        cpu_efficiency,
        memory_efficiency,
        efficiency_score,
    })
}
