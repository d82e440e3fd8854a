//! Earliest Deadline First scheduling
//!
//! Preemptive, unit by unit, ordered by (deadline, arrival_time, pid). Every
//! process must declare a deadline.
//!
//! A miss is flagged once per process, the first time it is about to run at
//! or after its deadline; from then on its Gantt segments are marked late.
//! Completion steps say whether the process finished on time.

use std::collections::BTreeSet;

use super::run::{execute_schedule, run_preemptive, DispatchRule, PreemptiveRule, RunOutcome};
use super::table::ProcessRecord;
use super::{Scheduler, SchedulerConfig};
use crate::core::Time;
use crate::error::SimulationError;
use crate::metrics::{DeadlineMetrics, MetricMap};
use crate::models::{
    CpuSnapshot, ExecutionTrace, GanttEntry, Pid, Process, SimulationResult, StepState,
};

/// EDF scheduler
///
/// # Example
/// ```
/// use os_simulator_core_rs::models::Process;
/// use os_simulator_core_rs::scheduling::{EdfScheduler, Scheduler};
///
/// let processes = vec![
///     Process::new(1, 0, 3).unwrap().with_deadline(4).unwrap(),
///     Process::new(2, 1, 2).unwrap().with_deadline(3).unwrap(),
/// ];
/// let result = EdfScheduler.execute(&processes).unwrap();
///
/// assert_eq!(result.metric("missed_deadlines"), Some(1.0));
/// assert_eq!(result.metric("schedulability"), Some(0.5));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EdfScheduler;

#[derive(Debug, Default)]
struct EarliestDeadline {
    missed: BTreeSet<Pid>,
}

impl EarliestDeadline {
    fn deadline(record: &ProcessRecord) -> Time {
        record.deadline.unwrap_or(Time::MAX)
    }
}

impl DispatchRule for EarliestDeadline {
    type Rank = Time;

    fn rank(&self, record: &ProcessRecord) -> Time {
        Self::deadline(record)
    }

    fn annotate(&self, record: &ProcessRecord, entry: GanttEntry) -> GanttEntry {
        entry.with_deadline(Self::deadline(record), self.missed.contains(&record.pid))
    }
}

impl PreemptiveRule for EarliestDeadline {
    fn before_unit(&mut self, record: &ProcessRecord, now: Time, trace: &mut ExecutionTrace) {
        let deadline = Self::deadline(record);
        if now < deadline || !self.missed.insert(record.pid) {
            return;
        }
        log::debug!("EDF: t={} P{} missed deadline {}", now, record.pid, deadline);
        let snapshot = CpuSnapshot::at(now)
            .running(record.pid)
            .with_deadline(deadline);
        trace
            .record(
                now,
                format!("Process P{} MISSED DEADLINE ({})", record.pid, deadline),
                StepState::Cpu(snapshot.clone()),
                StepState::Cpu(snapshot.with_deadline_missed(true)),
            )
            .for_process(record.pid);
    }

    fn completion(&self, record: &ProcessRecord, now: Time) -> (String, CpuSnapshot) {
        let deadline = Self::deadline(record);
        let met = now <= deadline;
        (
            format!(
                "Process P{} completes execution ({})",
                record.pid,
                if met { "ON TIME" } else { "LATE" }
            ),
            CpuSnapshot::at(now)
                .with_deadline(deadline)
                .with_deadline_met(met),
        )
    }
}

impl Scheduler for EdfScheduler {
    fn name(&self) -> String {
        "EDF (Earliest Deadline First)".to_string()
    }

    fn config(&self) -> SchedulerConfig {
        SchedulerConfig::Edf
    }

    fn execute(&self, processes: &[Process]) -> Result<SimulationResult, SimulationError> {
        if let Some(process) = processes.iter().find(|p| p.deadline().is_none()) {
            return Err(SimulationError::MissingDeadline(process.pid()));
        }

        execute_schedule(self.name(), self.config(), processes, |run| {
            let mut rule = EarliestDeadline::default();
            run_preemptive(run, &mut rule)?;

            let mut extra_metrics = MetricMap::new();
            DeadlineMetrics::new(rule.missed.len(), run.table.len()).write_into(&mut extra_metrics);
            Ok(RunOutcome {
                extra_metrics,
                missed_deadlines: rule.missed.into_iter().collect(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(pid: Pid, arrival: Time, burst: Time, deadline: Time) -> Process {
        Process::new(pid, arrival, burst)
            .unwrap()
            .with_deadline(deadline)
            .unwrap()
    }

    #[test]
    fn test_missing_deadline_rejected() {
        let processes = vec![process(1, 0, 2, 5), Process::new(2, 0, 1).unwrap()];
        assert_eq!(
            EdfScheduler.execute(&processes).unwrap_err(),
            SimulationError::MissingDeadline(2)
        );
    }

    #[test]
    fn test_all_deadlines_met() {
        let processes = vec![process(1, 0, 2, 10), process(2, 0, 3, 4)];
        let result = EdfScheduler.execute(&processes).unwrap();
        let order: Vec<_> = result
            .visualization_data()
            .gantt_chart()
            .iter()
            .map(|e| e.process_id)
            .collect();
        assert_eq!(order, vec![2, 1]);
        assert_eq!(result.metric("missed_deadlines"), Some(0.0));
        assert_eq!(result.metric("deadline_miss_ratio"), Some(0.0));
        assert!(result.trace().steps_matching("ON TIME").len() == 2);
    }

    #[test]
    fn test_miss_recorded_once_and_sticky_in_gantt() {
        let processes = vec![process(1, 0, 3, 4), process(2, 1, 2, 3)];
        let result = EdfScheduler.execute(&processes).unwrap();

        let misses = result.trace().steps_matching("MISSED DEADLINE");
        assert_eq!(misses.len(), 1);
        assert_eq!(misses[0].action, "Process P1 MISSED DEADLINE (4)");
        assert_eq!(misses[0].timestamp, 4);

        let gantt = result.visualization_data().gantt_chart();
        let last = gantt.last().unwrap();
        assert_eq!((last.process_id, last.start_time, last.end_time), (1, 3, 5));
        assert_eq!(last.deadline_missed, Some(true));

        let completion = result.trace().steps_for_process(1);
        assert_eq!(
            completion.last().unwrap().action,
            "Process P1 completes execution (LATE)"
        );
        match result.visualization_data() {
            crate::models::VisualizationData::Schedule {
                missed_deadlines, ..
            } => assert_eq!(missed_deadlines, &vec![1]),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_equal_deadline_does_not_preempt() {
        let processes = vec![process(1, 0, 3, 8), process(2, 1, 1, 8)];
        let result = EdfScheduler.execute(&processes).unwrap();
        let first = &result.visualization_data().gantt_chart()[0];
        assert_eq!((first.process_id, first.end_time), (1, 3));
    }
}
