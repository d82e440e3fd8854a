//! Round Robin scheduling
//!
//! A FIFO ready queue and a fixed quantum. Each unit:
//! 1. Processes arriving at this instant join the tail
//! 2. If the CPU is free or the quantum is spent, the incumbent (if
//!    unfinished) rejoins the tail behind those arrivals, and the head is
//!    dispatched with a fresh quantum
//! 3. The running process executes one unit

use std::collections::VecDeque;

use super::run::{execute_schedule, RunOutcome, ScheduleRun};
use super::table::Slot;
use super::{Scheduler, SchedulerConfig};
use crate::core::Time;
use crate::error::SimulationError;
use crate::models::{CpuSnapshot, GanttEntry, Process, SimulationResult};

/// Round Robin scheduler
///
/// # Example
/// ```
/// use os_simulator_core_rs::models::Process;
/// use os_simulator_core_rs::scheduling::{RoundRobinScheduler, Scheduler};
///
/// let scheduler = RoundRobinScheduler::new(2).unwrap();
/// let processes = vec![Process::new(1, 0, 3).unwrap(), Process::new(2, 0, 2).unwrap()];
/// let result = scheduler.execute(&processes).unwrap();
///
/// assert_eq!(result.algorithm_name(), "Round Robin (q=2)");
/// assert_eq!(result.visualization_data().gantt_chart().len(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RoundRobinScheduler {
    time_quantum: Time,
}

impl RoundRobinScheduler {
    pub fn new(time_quantum: Time) -> Result<Self, SimulationError> {
        if time_quantum == 0 {
            return Err(SimulationError::InvalidConfig(
                "Round Robin time_quantum must be > 0".to_string(),
            ));
        }
        Ok(Self { time_quantum })
    }

    pub fn time_quantum(&self) -> Time {
        self.time_quantum
    }

    fn run(&self, run: &mut ScheduleRun) -> Result<(), SimulationError> {
        let mut ready: VecDeque<Slot> = VecDeque::new();
        let mut running: Option<Slot> = None;
        let mut quantum_left: Time = 0;

        while !run.table.all_completed() {
            let arrivals = run.table.admit_arrivals(run.clock.now());
            ready.extend(arrivals);

            if running.is_none() || quantum_left == 0 {
                if let Some(incumbent) = running.take() {
                    if run.table.get(incumbent).remaining_time > 0 {
                        log::trace!(
                            "{}: t={} quantum expired for P{}",
                            run.name(),
                            run.now(),
                            run.table.get(incumbent).pid
                        );
                        ready.push_back(incumbent);
                    }
                }

                let Some(next) = ready.pop_front() else {
                    run.idle_until_next_arrival()?;
                    continue;
                };
                let now = run.now();
                run.table.dispatch(next, now);
                running = Some(next);
                quantum_left = self.time_quantum();
            }

            let slot = running.ok_or_else(|| {
                SimulationError::InvariantViolation("Round Robin lost its running process".into())
            })?;
            let now = run.now();
            let pid = run.table.get(slot).pid;
            let remaining = run.run_unit(slot, GanttEntry::new(pid, now, now + 1))?;
            quantum_left -= 1;

            if remaining == 0 {
                let end = run.now();
                let queued = run.table.pids(ready.iter().copied());
                run.complete(
                    slot,
                    format!("Process P{} completes execution", pid),
                    CpuSnapshot::at(end).running(pid),
                    CpuSnapshot::at(end).with_ready_queue(queued),
                );
                running = None;
                quantum_left = 0;
            }
        }
        Ok(())
    }
}

impl Scheduler for RoundRobinScheduler {
    fn name(&self) -> String {
        format!("Round Robin (q={})", self.time_quantum())
    }

    fn config(&self) -> SchedulerConfig {
        SchedulerConfig::RoundRobin {
            time_quantum: self.time_quantum(),
        }
    }

    fn execute(&self, processes: &[Process]) -> Result<SimulationResult, SimulationError> {
        execute_schedule(self.name(), self.config(), processes, |run| {
            self.run(run)?;
            Ok(RunOutcome::default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(result: &SimulationResult) -> Vec<(u32, u64, u64)> {
        result
            .visualization_data()
            .gantt_chart()
            .iter()
            .map(|e| (e.process_id, e.start_time, e.end_time))
            .collect()
    }

    #[test]
    fn test_quantum_rotation() {
        let processes = vec![
            Process::new(1, 0, 5).unwrap(),
            Process::new(2, 1, 3).unwrap(),
            Process::new(3, 2, 1).unwrap(),
        ];
        let result = RoundRobinScheduler::new(2)
            .unwrap()
            .execute(&processes)
            .unwrap();
        // At t=2 P3 arrives before P1 is requeued, so P2 then P3 then P1
        assert_eq!(
            segments(&result),
            vec![(1, 0, 2), (2, 2, 4), (3, 4, 5), (1, 5, 7), (2, 7, 8), (1, 8, 9)]
        );
    }

    #[test]
    fn test_arrival_enqueued_before_incumbent() {
        let processes = vec![
            Process::new(1, 0, 4).unwrap(),
            Process::new(2, 2, 2).unwrap(),
        ];
        let result = RoundRobinScheduler::new(2)
            .unwrap()
            .execute(&processes)
            .unwrap();
        assert_eq!(segments(&result), vec![(1, 0, 2), (2, 2, 4), (1, 4, 6)]);
    }

    #[test]
    fn test_lone_process_keeps_cpu_across_quanta() {
        let processes = vec![Process::new(1, 0, 5).unwrap()];
        let result = RoundRobinScheduler::new(2)
            .unwrap()
            .execute(&processes)
            .unwrap();
        // Contiguous quanta of the same process merge into one entry
        assert_eq!(segments(&result), vec![(1, 0, 5)]);
        assert_eq!(result.execution_steps().len(), 1);
    }

    #[test]
    fn test_idle_until_late_arrival() {
        let processes = vec![
            Process::new(1, 0, 1).unwrap(),
            Process::new(2, 5, 2).unwrap(),
        ];
        let result = RoundRobinScheduler::new(4)
            .unwrap()
            .execute(&processes)
            .unwrap();
        assert_eq!(segments(&result), vec![(1, 0, 1), (2, 5, 7)]);
        assert_eq!(result.metric("total_execution_time"), Some(7.0));
    }
}
