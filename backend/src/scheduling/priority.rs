//! Priority scheduling
//!
//! Lower priority value means more urgent. Ordering key is
//! (priority, arrival_time, pid). The preemptive variant re-checks every
//! unit and switches only for a strictly lower priority value.

use super::run::{
    execute_schedule, run_preemptive, run_to_completion, DispatchRule, PreemptiveRule, RunOutcome,
};
use super::table::ProcessRecord;
use super::{Preemption, Scheduler, SchedulerConfig};
use crate::error::SimulationError;
use crate::models::{GanttEntry, Process, SimulationResult};

/// Priority scheduler, in either preemption mode
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityScheduler {
    preemption: Preemption,
}

impl PriorityScheduler {
    pub fn new(preemption: Preemption) -> Self {
        Self { preemption }
    }

    pub fn preemptive() -> Self {
        Self::new(Preemption::Preemptive)
    }

    pub fn preemption(&self) -> Preemption {
        self.preemption
    }
}

struct HighestPriority;

impl DispatchRule for HighestPriority {
    type Rank = i32;

    fn rank(&self, record: &ProcessRecord) -> i32 {
        record.priority
    }

    fn start_detail(&self, record: &ProcessRecord) -> String {
        format!(" (priority: {})", record.priority)
    }

    fn annotate(&self, record: &ProcessRecord, entry: GanttEntry) -> GanttEntry {
        entry.with_priority(record.priority)
    }
}

impl PreemptiveRule for HighestPriority {}

impl Scheduler for PriorityScheduler {
    fn name(&self) -> String {
        format!("Priority ({})", self.preemption())
    }

    fn config(&self) -> SchedulerConfig {
        SchedulerConfig::Priority {
            preemption: self.preemption(),
        }
    }

    fn execute(&self, processes: &[Process]) -> Result<SimulationResult, SimulationError> {
        let preemptive = self.preemption().is_preemptive();
        execute_schedule(self.name(), self.config(), processes, |run| {
            if preemptive {
                run_preemptive(run, &mut HighestPriority)?;
            } else {
                run_to_completion(run, &HighestPriority)?;
            }
            Ok(RunOutcome::default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workload() -> Vec<Process> {
        vec![
            Process::new(1, 0, 4).unwrap().with_priority(3),
            Process::new(2, 1, 3).unwrap().with_priority(1),
            Process::new(3, 2, 2).unwrap().with_priority(4),
            Process::new(4, 3, 1).unwrap().with_priority(2),
        ]
    }

    fn segments(result: &SimulationResult) -> Vec<(u32, u64, u64)> {
        result
            .visualization_data()
            .gantt_chart()
            .iter()
            .map(|e| (e.process_id, e.start_time, e.end_time))
            .collect()
    }

    #[test]
    fn test_non_preemptive_order() {
        let result = PriorityScheduler::default().execute(&workload()).unwrap();
        assert_eq!(
            segments(&result),
            vec![(1, 0, 4), (2, 4, 7), (4, 7, 8), (3, 8, 10)]
        );
        assert_eq!(
            result.execution_steps()[2].action,
            "Process P2 starts execution (priority: 1)"
        );
    }

    #[test]
    fn test_preemptive_switches_on_lower_value() {
        let result = PriorityScheduler::preemptive()
            .execute(&workload())
            .unwrap();
        assert_eq!(
            segments(&result),
            vec![(1, 0, 1), (2, 1, 4), (4, 4, 5), (1, 5, 8), (3, 8, 10)]
        );
    }

    #[test]
    fn test_gantt_carries_priority() {
        let result = PriorityScheduler::preemptive()
            .execute(&workload())
            .unwrap();
        let priorities: Vec<_> = result
            .visualization_data()
            .gantt_chart()
            .iter()
            .map(|e| e.priority)
            .collect();
        assert_eq!(priorities, vec![Some(3), Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_equal_priority_keeps_incumbent() {
        let processes = vec![
            Process::new(1, 0, 3).unwrap().with_priority(2),
            Process::new(2, 1, 3).unwrap().with_priority(2),
        ];
        let result = PriorityScheduler::preemptive().execute(&processes).unwrap();
        assert_eq!(segments(&result), vec![(1, 0, 3), (2, 3, 6)]);
    }
}
