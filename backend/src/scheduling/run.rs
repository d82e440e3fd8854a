//! Shared scheduling loops
//!
//! Every scheduler runs on a `ScheduleRun`: the clock, the process table,
//! the trace and the Gantt chart for one `execute` call. Policies that only
//! differ in how they order the ready set plug a `DispatchRule` into one of
//! two loops:
//!
//! - `run_to_completion`: the selected process keeps the CPU for its whole
//!   burst (FCFS, SJF, Priority non-preemptive)
//! - `run_preemptive`: the clock moves one unit at a time and the incumbent
//!   is displaced by any ready process that ranks strictly better
//!   (SRTF, Priority preemptive, EDF)
//!
//! Round Robin and MLFQ drive `ScheduleRun` with their own queue logic.

use crate::core::{SimClock, Time};
use crate::error::SimulationError;
use crate::metrics::{MetricMap, SchedulingMetrics};
use crate::models::{
    CpuSnapshot, ExecutionTrace, GanttChart, GanttEntry, InputParameters, Pid, Process,
    SimulationResult, StepState, VisualizationData,
};
use crate::scheduling::table::{validate_workload, ProcessRecord, ProcessTable, Slot};
use crate::scheduling::SchedulerConfig;

/// Policy-specific additions to the final result
#[derive(Debug, Default)]
pub(crate) struct RunOutcome {
    pub extra_metrics: MetricMap,
    pub missed_deadlines: Vec<Pid>,
}

/// Working state of one scheduling run
#[derive(Debug)]
pub(crate) struct ScheduleRun {
    pub clock: SimClock,
    pub table: ProcessTable,
    pub trace: ExecutionTrace,
    pub gantt: GanttChart,
    name: String,
}

impl ScheduleRun {
    fn new(name: String, processes: &[Process]) -> Self {
        Self {
            clock: SimClock::new(),
            table: ProcessTable::new(processes),
            trace: ExecutionTrace::new(),
            gantt: GanttChart::new(),
            name,
        }
    }

    pub fn now(&self) -> Time {
        self.clock.now()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nothing is ready: move the clock to the next arrival
    pub fn idle_until_next_arrival(&mut self) -> Result<(), SimulationError> {
        let next = self.table.next_arrival().ok_or_else(|| {
            SimulationError::InvariantViolation(format!(
                "{}: ready set empty at t={} with no pending arrival",
                self.name,
                self.clock.now()
            ))
        })?;
        log::trace!("{}: idle {} -> {}", self.name, self.clock.now(), next);
        self.clock.jump_to(next);
        Ok(())
    }

    /// Run `slot` for one time unit and chart it
    ///
    /// Returns the remaining time after the unit.
    pub fn run_unit(&mut self, slot: Slot, entry: GanttEntry) -> Result<Time, SimulationError> {
        let remaining = self.table.run_for(slot, 1)?;
        self.clock.tick();
        self.gantt.push(entry);
        Ok(remaining)
    }

    /// Record completion of `slot` at the current time
    pub fn complete(
        &mut self,
        slot: Slot,
        action: String,
        state_before: CpuSnapshot,
        state_after: CpuSnapshot,
    ) {
        let now = self.clock.now();
        let pid = self.table.get(slot).pid;
        self.table.complete(slot, now);
        log::debug!("{}: t={} {}", self.name, now, action);
        self.trace
            .record(
                now,
                action,
                StepState::Cpu(state_before),
                StepState::Cpu(state_after),
            )
            .for_process(pid);
    }

    fn finish(
        self,
        outcome: RunOutcome,
        input_parameters: InputParameters,
    ) -> Result<SimulationResult, SimulationError> {
        let process_stats = self.table.stats()?;
        let mut metrics = MetricMap::new();
        if let Some(summary) = SchedulingMetrics::from_stats(&process_stats) {
            summary.write_into(&mut metrics);
        }
        metrics.extend(outcome.extra_metrics);

        Ok(SimulationResult::new(
            self.name,
            self.trace,
            metrics,
            VisualizationData::Schedule {
                gantt_chart: self.gantt.into_entries(),
                process_stats,
                missed_deadlines: outcome.missed_deadlines,
            },
            input_parameters,
        ))
    }
}

/// Validate, short-circuit the empty workload, run `body`, assemble
pub(crate) fn execute_schedule<F>(
    name: String,
    config: SchedulerConfig,
    processes: &[Process],
    body: F,
) -> Result<SimulationResult, SimulationError>
where
    F: FnOnce(&mut ScheduleRun) -> Result<RunOutcome, SimulationError>,
{
    validate_workload(processes)?;

    let input_parameters = InputParameters::Scheduling {
        process_count: processes.len(),
        scheduler: config,
        processes: processes.to_vec(),
    };

    if processes.is_empty() {
        return Ok(SimulationResult::empty(
            name,
            VisualizationData::empty_schedule(),
            input_parameters,
        ));
    }

    log::debug!("{}: scheduling {} processes", name, processes.len());
    let mut run = ScheduleRun::new(name, processes);
    let outcome = body(&mut run)?;
    if !run.table.all_completed() {
        return Err(SimulationError::InvariantViolation(format!(
            "{}: loop ended with unfinished processes",
            run.name
        )));
    }
    run.finish(outcome, input_parameters)
}

// ============================================================================
// Ready-set ordering
// ============================================================================

/// Ordering of the ready set for rank-driven policies
///
/// The ready process with the smallest `(rank, arrival_time, pid)` is
/// dispatched next. Preemption compares ranks alone, strictly.
pub(crate) trait DispatchRule {
    type Rank: Ord + Copy + std::fmt::Debug;

    fn rank(&self, record: &ProcessRecord) -> Self::Rank;

    /// Suffix for the start action of run-to-completion policies
    fn start_detail(&self, _record: &ProcessRecord) -> String {
        String::new()
    }

    /// Policy annotations on a Gantt segment
    fn annotate(&self, _record: &ProcessRecord, entry: GanttEntry) -> GanttEntry {
        entry
    }
}

/// Position in `ready` of the next process to dispatch
fn select<R: DispatchRule>(rule: &R, table: &ProcessTable, ready: &[Slot]) -> Option<usize> {
    ready
        .iter()
        .enumerate()
        .min_by_key(|&(_, &slot)| {
            let record = table.get(slot);
            (rule.rank(record), record.arrival_time, record.pid)
        })
        .map(|(position, _)| position)
}

/// Non-preemptive loop: each selected process runs its whole burst
pub(crate) fn run_to_completion<R: DispatchRule>(
    run: &mut ScheduleRun,
    rule: &R,
) -> Result<(), SimulationError> {
    let mut ready: Vec<Slot> = Vec::new();

    while !run.table.all_completed() {
        let arrivals = run.table.admit_arrivals(run.clock.now());
        ready.extend(arrivals);

        let Some(position) = select(rule, &run.table, &ready) else {
            run.idle_until_next_arrival()?;
            continue;
        };

        let now = run.now();
        let queued_before = run.table.pids(ready.iter().copied());
        let slot = ready.remove(position);
        let record = run.table.get(slot).clone();
        run.table.dispatch(slot, now);

        let action = format!(
            "Process P{} starts execution{}",
            record.pid,
            rule.start_detail(&record)
        );
        log::debug!("{}: t={} {}", run.name(), now, action);
        run.trace
            .record(
                now,
                action,
                StepState::Cpu(CpuSnapshot::at(now).with_ready_queue(queued_before)),
                StepState::Cpu(
                    CpuSnapshot::at(now)
                        .running(record.pid)
                        .with_ready_queue(run.table.pids(ready.iter().copied())),
                ),
            )
            .for_process(record.pid);

        let start = run.clock.advance(record.burst_time);
        let end = run.now();
        run.table.run_for(slot, record.burst_time)?;
        run.gantt
            .push(rule.annotate(&record, GanttEntry::new(record.pid, start, end)));

        run.complete(
            slot,
            format!("Process P{} completes execution", record.pid),
            CpuSnapshot::at(start).running(record.pid),
            CpuSnapshot::at(end),
        );
    }
    Ok(())
}

/// Extra hooks for the per-tick preemptive loop
pub(crate) trait PreemptiveRule: DispatchRule {
    /// Called before each unit the running process executes
    fn before_unit(&mut self, _record: &ProcessRecord, _now: Time, _trace: &mut ExecutionTrace) {}

    /// Action and post-state for a completion at `now`
    fn completion(&self, record: &ProcessRecord, now: Time) -> (String, CpuSnapshot) {
        (
            format!("Process P{} completes execution", record.pid),
            CpuSnapshot::at(now),
        )
    }
}

/// Preemptive loop: one unit per iteration, strict-rank preemption
pub(crate) fn run_preemptive<R: PreemptiveRule>(
    run: &mut ScheduleRun,
    rule: &mut R,
) -> Result<(), SimulationError> {
    let mut ready: Vec<Slot> = Vec::new();
    let mut running: Option<Slot> = None;

    while !run.table.all_completed() {
        let arrivals = run.table.admit_arrivals(run.clock.now());
        ready.extend(arrivals);

        if let Some(current) = running {
            if let Some(position) = select(&*rule, &run.table, &ready) {
                let challenger = run.table.get(ready[position]);
                let incumbent = run.table.get(current);
                if rule.rank(challenger) < rule.rank(incumbent) {
                    log::debug!(
                        "{}: t={} P{} preempts P{} ({:?} < {:?})",
                        run.name(),
                        run.now(),
                        challenger.pid,
                        incumbent.pid,
                        rule.rank(challenger),
                        rule.rank(incumbent)
                    );
                    ready.push(current);
                    running = None;
                }
            }
        }

        let slot = match running {
            Some(slot) => slot,
            None => {
                let Some(position) = select(&*rule, &run.table, &ready) else {
                    run.idle_until_next_arrival()?;
                    continue;
                };
                let slot = ready.remove(position);
                let now = run.now();
                run.table.dispatch(slot, now);
                running = Some(slot);
                slot
            }
        };

        let now = run.now();
        let record = run.table.get(slot).clone();
        rule.before_unit(&record, now, &mut run.trace);

        let entry = rule.annotate(&record, GanttEntry::new(record.pid, now, now + 1));
        let remaining = run.run_unit(slot, entry)?;
        log::trace!("{}: t={} P{} remaining {}", run.name(), now, record.pid, remaining);

        if remaining == 0 {
            let end = run.now();
            let finished = run.table.get(slot).clone();
            let (action, after) = rule.completion(&finished, end);
            run.complete(slot, action, CpuSnapshot::at(end).running(finished.pid), after);
            running = None;
        }
    }
    Ok(())
}
