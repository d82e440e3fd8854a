//! Multi-Level Feedback Queue scheduling
//!
//! # Behavior
//!
//! - Level 0 is the most urgent; each level has its own quantum
//! - Arrivals always enter level 0
//! - A process whose quantum runs out before it finishes drops one level,
//!   never below the last
//! - Every unit a process spends queued increments its waiting counter;
//!   at the aging threshold it moves to the tail of the level above and the
//!   counter resets
//! - Dispatch scans from level 0 and takes the head of the first non-empty
//!   queue; a running process is never interrupted mid-quantum

use std::collections::VecDeque;

use super::run::{execute_schedule, RunOutcome, ScheduleRun};
use super::table::Slot;
use super::{MlfqConfig, Scheduler, SchedulerConfig};
use crate::core::Time;
use crate::error::SimulationError;
use crate::models::{CpuSnapshot, GanttEntry, Process, SimulationResult};

/// MLFQ scheduler
#[derive(Debug, Clone)]
pub struct MlfqScheduler {
    config: MlfqConfig,
    quantums: Vec<Time>,
}

impl MlfqScheduler {
    pub fn new(config: MlfqConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let quantums = config.resolved_quantums();
        Ok(Self { config, quantums })
    }

    pub fn num_queues(&self) -> usize {
        self.quantums.len()
    }

    /// Effective quantum per level
    pub fn quantums(&self) -> &[Time] {
        &self.quantums
    }

    pub fn aging_threshold(&self) -> Time {
        self.config.aging_threshold
    }

    fn run(&self, run: &mut ScheduleRun) -> Result<(), SimulationError> {
        let lowest = self.num_queues() - 1;
        let mut queues: Vec<VecDeque<Slot>> = vec![VecDeque::new(); self.num_queues()];
        let mut level = vec![0usize; run.table.len()];
        let mut waiting = vec![0 as Time; run.table.len()];
        let mut running: Option<Slot> = None;
        let mut quantum_left: Time = 0;

        while !run.table.all_completed() {
            for slot in run.table.admit_arrivals(run.clock.now()) {
                queues[0].push_back(slot);
                level[slot] = 0;
                waiting[slot] = 0;
            }

            // Aging, in admission order
            for slot in 0..run.table.len() {
                if !run.table.is_admitted(slot)
                    || run.table.get(slot).is_completed()
                    || running == Some(slot)
                {
                    continue;
                }
                waiting[slot] += 1;
                let current = level[slot];
                if waiting[slot] >= self.aging_threshold() && current > 0 {
                    if let Some(position) = queues[current].iter().position(|&s| s == slot) {
                        queues[current].remove(position);
                        queues[current - 1].push_back(slot);
                        level[slot] = current - 1;
                        waiting[slot] = 0;
                        log::debug!(
                            "{}: t={} P{} aged up to queue {}",
                            run.name(),
                            run.now(),
                            run.table.get(slot).pid,
                            current - 1
                        );
                    }
                }
            }

            if running.is_none() || quantum_left == 0 {
                if let Some(incumbent) = running.take() {
                    if run.table.get(incumbent).remaining_time > 0 {
                        let demoted = (level[incumbent] + 1).min(lowest);
                        queues[demoted].push_back(incumbent);
                        level[incumbent] = demoted;
                        waiting[incumbent] = 0;
                        log::debug!(
                            "{}: t={} P{} demoted to queue {}",
                            run.name(),
                            run.now(),
                            run.table.get(incumbent).pid,
                            demoted
                        );
                    }
                }

                let Some(next) = queues.iter_mut().find_map(VecDeque::pop_front) else {
                    run.idle_until_next_arrival()?;
                    continue;
                };
                let now = run.now();
                run.table.dispatch(next, now);
                running = Some(next);
                quantum_left = self.quantums[level[next]];
            }

            let slot = running.ok_or_else(|| {
                SimulationError::InvariantViolation("MLFQ lost its running process".into())
            })?;
            let now = run.now();
            let pid = run.table.get(slot).pid;
            let queue = level[slot];
            let entry =
                GanttEntry::new(pid, now, now + 1).with_queue_level(queue, self.quantums[queue]);
            let remaining = run.run_unit(slot, entry)?;
            quantum_left -= 1;

            if remaining == 0 {
                let end = run.now();
                run.complete(
                    slot,
                    format!("Process P{} completes execution (from queue {})", pid, queue),
                    CpuSnapshot::at(end).running(pid).with_queue_level(queue),
                    CpuSnapshot::at(end),
                );
                running = None;
                quantum_left = 0;
            }
        }
        Ok(())
    }
}

impl Default for MlfqScheduler {
    fn default() -> Self {
        let config = MlfqConfig::default();
        let quantums = config.resolved_quantums();
        Self { config, quantums }
    }
}

impl Scheduler for MlfqScheduler {
    fn name(&self) -> String {
        format!("MLFQ ({} levels)", self.num_queues())
    }

    fn config(&self) -> SchedulerConfig {
        SchedulerConfig::Mlfq(self.config.clone())
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

    fn segments(result: &SimulationResult) -> Vec<(u32, u64, u64, Option<usize>)> {
        result
            .visualization_data()
            .gantt_chart()
            .iter()
            .map(|e| (e.process_id, e.start_time, e.end_time, e.queue_level))
            .collect()
    }

    #[test]
    fn test_demotion_through_levels() {
        let processes = vec![Process::new(1, 0, 10).unwrap()];
        let result = MlfqScheduler::default().execute(&processes).unwrap();
        // Contiguous units merge and keep the starting level, so check steps
        assert_eq!(
            result.execution_steps()[0].action,
            "Process P1 completes execution (from queue 2)"
        );
        assert_eq!(result.metric("total_execution_time"), Some(10.0));
    }

    #[test]
    fn test_new_arrival_runs_before_demoted_process() {
        let processes = vec![
            Process::new(1, 0, 6).unwrap(),
            Process::new(2, 1, 2).unwrap(),
        ];
        let result = MlfqScheduler::default().execute(&processes).unwrap();
        // P1 uses its level-0 quantum, P2 (level 0) goes next, then P1 at level 1
        assert_eq!(
            segments(&result),
            vec![(1, 0, 2, Some(0)), (2, 2, 4, Some(0)), (1, 4, 8, Some(1))]
        );
    }

    #[test]
    fn test_aging_promotes_waiting_process() {
        let config = MlfqConfig {
            num_queues: 2,
            time_quantums: vec![1, 4],
            aging_threshold: 2,
        };
        let scheduler = MlfqScheduler::new(config).unwrap();
        let processes = vec![
            Process::new(1, 0, 3).unwrap(),
            Process::new(2, 0, 6).unwrap(),
        ];
        let result = scheduler.execute(&processes).unwrap();
        // P2 waits at level 1 while P1 finishes, then ages back to level 0
        // at t=4; its level-0 unit and the level-1 run after it are merged
        assert_eq!(
            segments(&result),
            vec![
                (1, 0, 1, Some(0)),
                (2, 1, 2, Some(0)),
                (1, 2, 4, Some(1)),
                (2, 4, 9, Some(0)),
            ]
        );
        assert_eq!(
            result.execution_steps()[1].action,
            "Process P2 completes execution (from queue 1)"
        );
    }

    #[test]
    fn test_quantums_extended_by_doubling() {
        let scheduler = MlfqScheduler::new(MlfqConfig {
            num_queues: 4,
            time_quantums: vec![3],
            aging_threshold: 10,
        })
        .unwrap();
        assert_eq!(scheduler.quantums(), &[3, 6, 12, 24]);
        assert_eq!(scheduler.name(), "MLFQ (4 levels)");
    }
}
