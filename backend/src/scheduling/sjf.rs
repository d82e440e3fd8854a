//! Shortest Job First scheduling
//!
//! - Non-preemptive: the ready process with the smallest burst runs to
//!   completion
//! - Preemptive (SRTF): every unit, a ready process with strictly less
//!   remaining time than the incumbent takes the CPU; equal remaining time
//!   never preempts
//!
//! Ties fall back to (arrival_time, pid).

use super::run::{
    execute_schedule, run_preemptive, run_to_completion, DispatchRule, PreemptiveRule, RunOutcome,
};
use super::table::ProcessRecord;
use super::{Preemption, Scheduler, SchedulerConfig};
use crate::core::Time;
use crate::error::SimulationError;
use crate::models::{Process, SimulationResult};

/// SJF scheduler, in either preemption mode
#[derive(Debug, Clone, Copy, Default)]
pub struct SjfScheduler {
    preemption: Preemption,
}

impl SjfScheduler {
    pub fn new(preemption: Preemption) -> Self {
        Self { preemption }
    }

    /// Shortest remaining time first
    pub fn preemptive() -> Self {
        Self::new(Preemption::Preemptive)
    }

    pub fn preemption(&self) -> Preemption {
        self.preemption
    }
}

struct ShortestBurst;

impl DispatchRule for ShortestBurst {
    type Rank = Time;

    fn rank(&self, record: &ProcessRecord) -> Time {
        record.burst_time
    }

    fn start_detail(&self, record: &ProcessRecord) -> String {
        format!(" (burst: {})", record.burst_time)
    }
}

struct ShortestRemaining;

impl DispatchRule for ShortestRemaining {
    type Rank = Time;

    fn rank(&self, record: &ProcessRecord) -> Time {
        record.remaining_time
    }
}

impl PreemptiveRule for ShortestRemaining {}

impl Scheduler for SjfScheduler {
    fn name(&self) -> String {
        format!("SJF ({})", self.preemption())
    }

    fn config(&self) -> SchedulerConfig {
        SchedulerConfig::Sjf {
            preemption: self.preemption(),
        }
    }

    fn execute(&self, processes: &[Process]) -> Result<SimulationResult, SimulationError> {
        let preemptive = self.preemption().is_preemptive();
        execute_schedule(self.name(), self.config(), processes, |run| {
            if preemptive {
                run_preemptive(run, &mut ShortestRemaining)?;
            } else {
                run_to_completion(run, &ShortestBurst)?;
            }
            Ok(RunOutcome::default())
        })
    }
}
