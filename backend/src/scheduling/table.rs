//! Per-run working state for scheduling
//!
//! The caller's `Process` values are never mutated. Each run copies the
//! fields it needs into an arena of `ProcessRecord`s, addressed by slot, and
//! all mutable bookkeeping (remaining time, first dispatch, completion)
//! lives there. Ready queues hold slots, not processes.
//!
//! Records are stored in (arrival_time, pid) order, so admitting arrivals by
//! scanning the arena yields a deterministic order for same-tick arrivals.

use std::collections::BTreeSet;

use crate::core::Time;
use crate::error::SimulationError;
use crate::metrics::ProcessStats;
use crate::models::{Pid, Process};

/// Index of a record in the process table
pub(crate) type Slot = usize;

/// Mutable working copy of one process
#[derive(Debug, Clone)]
pub(crate) struct ProcessRecord {
    pub pid: Pid,
    pub arrival_time: Time,
    pub burst_time: Time,
    pub priority: i32,
    pub deadline: Option<Time>,
    pub remaining_time: Time,
    pub first_dispatch: Option<Time>,
    pub completion_time: Option<Time>,
    admitted: bool,
}

impl ProcessRecord {
    fn from_process(process: &Process) -> Self {
        Self {
            pid: process.pid(),
            arrival_time: process.arrival_time(),
            burst_time: process.burst_time(),
            priority: process.priority(),
            deadline: process.deadline(),
            remaining_time: process.burst_time(),
            first_dispatch: None,
            completion_time: None,
            admitted: false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }
}

/// Check every process, then reject duplicate pids and workloads whose
/// timeline would not fit in `Time`
pub(crate) fn validate_workload(processes: &[Process]) -> Result<(), SimulationError> {
    let mut seen = BTreeSet::new();
    for process in processes {
        process
            .validate()
            .map_err(|source| SimulationError::InvalidProcess {
                pid: process.pid(),
                source,
            })?;
        if !seen.insert(process.pid()) {
            return Err(SimulationError::DuplicatePid(process.pid()));
        }
    }

    // The clock never passes the last arrival plus all the work
    let last_arrival = processes
        .iter()
        .map(Process::arrival_time)
        .max()
        .unwrap_or(0);
    let horizon = processes
        .iter()
        .map(Process::burst_time)
        .try_fold(last_arrival, |acc, burst| acc.checked_add(burst));
    if horizon.is_none() {
        return Err(SimulationError::InvalidConfig(format!(
            "workload runs past the end of simulated time (last arrival {})",
            last_arrival
        )));
    }
    Ok(())
}

/// Arena of working records for one run
#[derive(Debug)]
pub(crate) struct ProcessTable {
    records: Vec<ProcessRecord>,
    completed: usize,
}

impl ProcessTable {
    pub fn new(processes: &[Process]) -> Self {
        let mut records: Vec<_> = processes.iter().map(ProcessRecord::from_process).collect();
        records.sort_by_key(|r| (r.arrival_time, r.pid));
        Self {
            records,
            completed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, slot: Slot) -> &ProcessRecord {
        &self.records[slot]
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.records.len()
    }

    /// Mark every process with arrival_time <= `now` as admitted
    ///
    /// Returns the newly admitted slots in (arrival_time, pid) order.
    pub fn admit_arrivals(&mut self, now: Time) -> Vec<Slot> {
        let mut admitted = Vec::new();
        for (slot, record) in self.records.iter_mut().enumerate() {
            if !record.admitted && record.arrival_time <= now {
                record.admitted = true;
                admitted.push(slot);
            }
        }
        admitted
    }

    pub fn is_admitted(&self, slot: Slot) -> bool {
        self.records[slot].admitted
    }

    /// Earliest arrival among processes not yet admitted
    pub fn next_arrival(&self) -> Option<Time> {
        self.records
            .iter()
            .filter(|r| !r.admitted)
            .map(|r| r.arrival_time)
            .min()
    }

    /// Give `slot` the CPU at `now`; returns true on its first dispatch
    pub fn dispatch(&mut self, slot: Slot, now: Time) -> bool {
        let record = &mut self.records[slot];
        if record.first_dispatch.is_none() {
            record.first_dispatch = Some(now);
            true
        } else {
            false
        }
    }

    /// Consume `units` of CPU; returns the remaining time
    pub fn run_for(&mut self, slot: Slot, units: Time) -> Result<Time, SimulationError> {
        let record = &mut self.records[slot];
        record.remaining_time = record.remaining_time.checked_sub(units).ok_or_else(|| {
            SimulationError::InvariantViolation(format!(
                "P{} ran {} units with only {} remaining",
                record.pid, units, record.remaining_time
            ))
        })?;
        Ok(record.remaining_time)
    }

    pub fn complete(&mut self, slot: Slot, now: Time) {
        let record = &mut self.records[slot];
        if record.completion_time.is_none() {
            record.completion_time = Some(now);
            self.completed += 1;
        }
    }

    pub fn pids(&self, slots: impl IntoIterator<Item = Slot>) -> Vec<Pid> {
        slots
            .into_iter()
            .map(|slot| self.records[slot].pid)
            .collect()
    }

    /// Per-process outcomes in ascending pid order
    pub fn stats(&self) -> Result<Vec<ProcessStats>, SimulationError> {
        let mut stats = self
            .records
            .iter()
            .map(|r| {
                let (Some(completion), Some(first_dispatch)) = (r.completion_time, r.first_dispatch)
                else {
                    return Err(SimulationError::InvariantViolation(format!(
                        "P{} never completed",
                        r.pid
                    )));
                };
                Ok(ProcessStats::new(
                    r.pid,
                    r.arrival_time,
                    r.burst_time,
                    completion,
                    first_dispatch,
                    r.deadline,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;
        stats.sort_by_key(|s| s.pid);
        Ok(stats)
    }
}
