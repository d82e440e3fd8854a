//! Process model
//!
//! A process is the unit of work handed to the CPU scheduling engines.
//! Each process has:
//! - A caller-assigned pid (unique within one workload)
//! - Arrival time and total CPU burst
//! - Priority (lower value = more urgent)
//! - Optional deadline (required by EDF)
//! - A page reference string and declared I/O intervals, carried for
//!   hybrid collaborators and never scheduled by the core
//!
//! Processes are validated when they are built, so the engines can assume
//! well-formed input. Mutable per-run state (remaining time, first dispatch,
//! completion) lives in the engines' own working records, never here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Time;

/// Process identifier
pub type Pid = u32;

/// Page number in a reference string
pub type PageNumber = u32;

/// Errors raised while building or validating a process
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("burst time must be positive")]
    InvalidBurst,

    #[error("deadline {deadline} is before arrival time {arrival_time}")]
    DeadlineBeforeArrival { arrival_time: Time, deadline: Time },

    #[error("I/O operation at {start_time} must have a positive duration")]
    InvalidIoDuration { start_time: Time },
}

/// Declared I/O interval (recorded, not simulated)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoOperation {
    pub start_time: Time,
    pub duration: Time,
    #[serde(default = "default_io_kind")]
    pub operation_type: String,
}

fn default_io_kind() -> String {
    "disk".to_string()
}

impl IoOperation {
    pub fn new(start_time: Time, duration: Time, operation_type: impl Into<String>) -> Self {
        Self {
            start_time,
            duration,
            operation_type: operation_type.into(),
        }
    }

    /// Disk I/O starting at `start_time` for `duration` units
    pub fn disk(start_time: Time, duration: Time) -> Self {
        Self::new(start_time, duration, default_io_kind())
    }
}

/// A process submitted to a scheduler
///
/// # Example
/// ```
/// use os_simulator_core_rs::Process;
///
/// let p = Process::new(1, 0, 5)
///     .unwrap()
///     .with_priority(2)
///     .with_deadline(12)
///     .unwrap();
///
/// assert_eq!(p.pid(), 1);
/// assert_eq!(p.burst_time(), 5);
/// assert_eq!(p.deadline(), Some(12));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pid: Pid,
    arrival_time: Time,
    burst_time: Time,
    #[serde(default)]
    priority: i32,
    #[serde(default)]
    deadline: Option<Time>,
    #[serde(default)]
    memory_pages: Vec<PageNumber>,
    #[serde(default)]
    io_operations: Vec<IoOperation>,
}

impl Process {
    /// Create a process with default priority 0 and no deadline
    ///
    /// # Errors
    /// `ProcessError::InvalidBurst` if `burst_time` is zero.
    pub fn new(pid: Pid, arrival_time: Time, burst_time: Time) -> Result<Self, ProcessError> {
        let process = Self {
            pid,
            arrival_time,
            burst_time,
            priority: 0,
            deadline: None,
            memory_pages: Vec::new(),
            io_operations: Vec::new(),
        };
        process.validate()?;
        Ok(process)
    }

    /// Set priority (lower value = more urgent)
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set an absolute deadline
    ///
    /// # Errors
    /// `ProcessError::DeadlineBeforeArrival` if `deadline < arrival_time`.
    pub fn with_deadline(mut self, deadline: Time) -> Result<Self, ProcessError> {
        self.deadline = Some(deadline);
        self.validate()?;
        Ok(self)
    }

    /// Attach a page reference string
    pub fn with_memory_pages(mut self, pages: Vec<PageNumber>) -> Self {
        self.memory_pages = pages;
        self
    }

    /// Attach declared I/O intervals
    ///
    /// # Errors
    /// `ProcessError::InvalidIoDuration` if any interval has zero duration.
    pub fn with_io_operations(mut self, ops: Vec<IoOperation>) -> Result<Self, ProcessError> {
        self.io_operations = ops;
        self.validate()?;
        Ok(self)
    }

    /// Check every field invariant
    ///
    /// Processes built through the constructors are always valid; this
    /// exists for values that arrive through deserialization.
    pub fn validate(&self) -> Result<(), ProcessError> {
        if self.burst_time == 0 {
            return Err(ProcessError::InvalidBurst);
        }
        if let Some(deadline) = self.deadline {
            if deadline < self.arrival_time {
                return Err(ProcessError::DeadlineBeforeArrival {
                    arrival_time: self.arrival_time,
                    deadline,
                });
            }
        }
        if let Some(op) = self.io_operations.iter().find(|op| op.duration == 0) {
            return Err(ProcessError::InvalidIoDuration {
                start_time: op.start_time,
            });
        }
        Ok(())
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn arrival_time(&self) -> Time {
        self.arrival_time
    }

    pub fn burst_time(&self) -> Time {
        self.burst_time
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn deadline(&self) -> Option<Time> {
        self.deadline
    }

    pub fn memory_pages(&self) -> &[PageNumber] {
        &self.memory_pages
    }

    pub fn io_operations(&self) -> &[IoOperation] {
        &self.io_operations
    }

    /// Deadline minus (arrival + burst); `None` without a deadline
    ///
    /// Negative slack means the deadline cannot be met even with an idle CPU.
    pub fn slack(&self) -> Option<i64> {
        self.deadline.map(|deadline| {
            deadline as i64 - self.arrival_time as i64 - self.burst_time as i64
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_burst_rejected() {
        assert_eq!(Process::new(1, 0, 0), Err(ProcessError::InvalidBurst));
    }

    #[test]
    fn test_deadline_before_arrival_rejected() {
        let err = Process::new(1, 5, 2).unwrap().with_deadline(4).unwrap_err();
        assert_eq!(
            err,
            ProcessError::DeadlineBeforeArrival {
                arrival_time: 5,
                deadline: 4
            }
        );
    }

    #[test]
    fn test_deadline_equal_to_arrival_accepted() {
        let p = Process::new(1, 5, 2).unwrap().with_deadline(5).unwrap();
        assert_eq!(p.slack(), Some(-2));
    }

    #[test]
    fn test_deserialized_process_can_be_validated() {
        let p: Process =
            serde_json::from_str(r#"{"pid": 3, "arrival_time": 1, "burst_time": 0}"#).unwrap();
        assert_eq!(p.validate(), Err(ProcessError::InvalidBurst));
    }
}
