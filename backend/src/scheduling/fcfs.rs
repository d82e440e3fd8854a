//! First-Come-First-Served scheduling
//!
//! Processes run in arrival order, ties broken by pid, each for its whole
//! burst. Produces one Gantt entry per process.

use super::run::{execute_schedule, run_to_completion, DispatchRule, RunOutcome};
use super::table::ProcessRecord;
use super::{Scheduler, SchedulerConfig};
use crate::error::SimulationError;
use crate::models::{Process, SimulationResult};

/// FCFS scheduler
#[derive(Debug, Clone, Copy, Default)]
pub struct FcfsScheduler;

struct ArrivalOrder;

impl DispatchRule for ArrivalOrder {
    // The shared (arrival_time, pid) tie-break is the whole key
    type Rank = ();

    fn rank(&self, _record: &ProcessRecord) -> Self::Rank {}
}

impl Scheduler for FcfsScheduler {
    fn name(&self) -> String {
        "FCFS".to_string()
    }

    fn config(&self) -> SchedulerConfig {
        SchedulerConfig::Fcfs
    }

    fn execute(&self, processes: &[Process]) -> Result<SimulationResult, SimulationError> {
        execute_schedule(self.name(), self.config(), processes, |run| {
            run_to_completion(run, &ArrivalOrder)?;
            Ok(RunOutcome::default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StepState;

    fn textbook() -> Vec<Process> {
        vec![
            Process::new(1, 0, 5).unwrap(),
            Process::new(2, 1, 3).unwrap(),
            Process::new(3, 2, 8).unwrap(),
            Process::new(4, 3, 6).unwrap(),
        ]
    }

    #[test]
    fn test_textbook_completion_times() {
        let result = FcfsScheduler.execute(&textbook()).unwrap();
        let completions: Vec<_> = result
            .visualization_data()
            .process_stats()
            .iter()
            .map(|s| s.completion_time)
            .collect();
        assert_eq!(completions, vec![5, 8, 16, 22]);
        assert_eq!(result.metric("average_waiting_time"), Some(5.75));
        assert_eq!(result.metric("total_execution_time"), Some(22.0));
        assert_eq!(result.metric("cpu_utilization"), Some(1.0));
    }

    #[test]
    fn test_one_gantt_entry_per_process() {
        let result = FcfsScheduler.execute(&textbook()).unwrap();
        let gantt = result.visualization_data().gantt_chart();
        assert_eq!(gantt.len(), 4);
        assert_eq!(
            gantt
                .iter()
                .map(|e| (e.start_time, e.end_time))
                .collect::<Vec<_>>(),
            vec![(0, 5), (5, 8), (8, 16), (16, 22)]
        );
    }

    #[test]
    fn test_idle_gap_jumps_to_next_arrival() {
        let processes = vec![
            Process::new(1, 0, 2).unwrap(),
            Process::new(2, 10, 3).unwrap(),
        ];
        let result = FcfsScheduler.execute(&processes).unwrap();
        let gantt = result.visualization_data().gantt_chart();
        assert_eq!(gantt[1].start_time, 10);
        assert_eq!(gantt[1].end_time, 13);
        // No steps are recorded for the idle period
        assert_eq!(result.execution_steps().len(), 4);
        assert_eq!(result.metric("cpu_utilization"), Some(5.0 / 13.0));
    }

    #[test]
    fn test_same_arrival_breaks_tie_by_pid() {
        let processes = vec![
            Process::new(9, 0, 1).unwrap(),
            Process::new(4, 0, 1).unwrap(),
        ];
        let result = FcfsScheduler.execute(&processes).unwrap();
        assert_eq!(result.visualization_data().gantt_chart()[0].process_id, 4);
    }

    #[test]
    fn test_start_and_completion_steps() {
        let result = FcfsScheduler.execute(&textbook()).unwrap();
        let steps = result.execution_steps();
        assert_eq!(steps.len(), 8);
        assert_eq!(steps[0].action, "Process P1 starts execution");
        assert_eq!(steps[1].action, "Process P1 completes execution");
        assert_eq!(steps[1].timestamp, 5);
        match &steps[2].state_before {
            StepState::Cpu(cpu) => assert_eq!(cpu.ready_queue, Some(vec![2, 3, 4])),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_empty_workload() {
        let result = FcfsScheduler.execute(&[]).unwrap();
        assert!(result.execution_steps().is_empty());
        assert!(result.metrics().is_empty());
        assert_eq!(result.algorithm_name(), "FCFS");
    }
}
