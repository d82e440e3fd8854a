//! Execution trace for auditing a simulation run.
//!
//! Every engine appends `SimulationStep`s to an `ExecutionTrace` as it runs.
//! The trace is the audit log of a run:
//! - Steps are numbered by append order (step_number == index)
//! - Timestamps are simulated clock values and may repeat when several
//!   sub-events happen at the same tick
//! - Each step carries a policy-defined snapshot of engine state taken
//!   before and after the event
//!
//! # Example
//!
//! ```rust
//! use os_simulator_core_rs::models::{CpuSnapshot, ExecutionTrace, StepState};
//!
//! let mut trace = ExecutionTrace::new();
//! trace
//!     .record(
//!         5,
//!         "Process P1 completes execution",
//!         StepState::Cpu(CpuSnapshot::at(4).running(1)),
//!         StepState::Cpu(CpuSnapshot::at(5)),
//!     )
//!     .for_process(1);
//!
//! assert_eq!(trace.len(), 1);
//! assert_eq!(trace.steps_for_process(1).len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::Time;
use crate::models::frame::{Frame, FrameId};
use crate::models::process::{PageNumber, Pid};

/// Snapshot of one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame_id: FrameId,
    pub page_number: Option<PageNumber>,
    pub last_access_time: usize,
    pub reference_bit: bool,
    pub is_empty: bool,
}

impl From<&Frame> for FrameSnapshot {
    fn from(frame: &Frame) -> Self {
        FrameSnapshot {
            frame_id: frame.frame_id(),
            page_number: frame.page_number(),
            last_access_time: frame.last_access_time(),
            reference_bit: frame.reference_bit(),
            is_empty: frame.is_empty(),
        }
    }
}

/// Frame pool state, plus the replacement policy's own bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub frames: Vec<FrameSnapshot>,
    /// FIFO load order of frame ids (oldest first)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insertion_order: Option<Vec<FrameId>>,
    /// Clock hand position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_hand: Option<FrameId>,
}

impl MemorySnapshot {
    pub fn of(frames: &[Frame]) -> Self {
        Self {
            frames: frames.iter().map(FrameSnapshot::from).collect(),
            insertion_order: None,
            clock_hand: None,
        }
    }

    /// Resident pages in frame order (`None` for empty frames)
    pub fn pages(&self) -> Vec<Option<PageNumber>> {
        self.frames.iter().map(|f| f.page_number).collect()
    }
}

/// Processor state around a scheduling event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub current_time: Time,
    pub running_process: Option<Pid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_queue: Option<Vec<Pid>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_level: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_met: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_missed: Option<bool>,
}

impl CpuSnapshot {
    /// Idle processor at `current_time`
    pub fn at(current_time: Time) -> Self {
        Self {
            current_time,
            ..Self::default()
        }
    }

    pub fn running(mut self, pid: Pid) -> Self {
        self.running_process = Some(pid);
        self
    }

    pub fn with_ready_queue(mut self, pids: Vec<Pid>) -> Self {
        self.ready_queue = Some(pids);
        self
    }

    pub fn with_queue_level(mut self, level: usize) -> Self {
        self.queue_level = Some(level);
        self
    }

    pub fn with_deadline(mut self, deadline: Time) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_deadline_met(mut self, met: bool) -> Self {
        self.deadline_met = Some(met);
        self
    }

    pub fn with_deadline_missed(mut self, missed: bool) -> Self {
        self.deadline_missed = Some(missed);
        self
    }
}

/// Policy-defined engine state attached to a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepState {
    Memory(MemorySnapshot),
    Cpu(CpuSnapshot),
}

/// One entry of the execution trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStep {
    pub step_number: usize,
    pub timestamp: Time,
    pub action: String,
    pub state_before: StepState,
    pub state_after: StepState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fault: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<Pid>,
}

impl SimulationStep {
    /// Tag this step as a page reference outcome
    pub fn as_reference(&mut self, hit: bool) -> &mut Self {
        self.is_hit = Some(hit);
        self.is_fault = Some(!hit);
        self
    }

    /// Tag this step with the process it concerns
    pub fn for_process(&mut self, pid: Pid) -> &mut Self {
        self.process_id = Some(pid);
        self
    }
}

/// Ordered log of simulation steps
///
/// Numbering is owned by the trace, so `step_number` always equals the
/// step's index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionTrace {
    steps: Vec<SimulationStep>,
}

impl ExecutionTrace {
    /// Create a new empty trace
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step and return it for tagging
    pub fn record(
        &mut self,
        timestamp: Time,
        action: impl Into<String>,
        state_before: StepState,
        state_after: StepState,
    ) -> &mut SimulationStep {
        let step_number = self.steps.len();
        self.steps.push(SimulationStep {
            step_number,
            timestamp,
            action: action.into(),
            state_before,
            state_after,
            is_hit: None,
            is_fault: None,
            process_id: None,
        });
        &mut self.steps[step_number]
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// All steps in append order
    pub fn steps(&self) -> &[SimulationStep] {
        &self.steps
    }

    /// Steps stamped with a given clock value
    pub fn steps_at(&self, timestamp: Time) -> Vec<&SimulationStep> {
        self.steps
            .iter()
            .filter(|s| s.timestamp == timestamp)
            .collect()
    }

    /// Steps concerning a given process
    pub fn steps_for_process(&self, pid: Pid) -> Vec<&SimulationStep> {
        self.steps
            .iter()
            .filter(|s| s.process_id == Some(pid))
            .collect()
    }

    /// Page references that hit
    pub fn hits(&self) -> Vec<&SimulationStep> {
        self.steps
            .iter()
            .filter(|s| s.is_hit == Some(true))
            .collect()
    }

    /// Page references that faulted
    pub fn faults(&self) -> Vec<&SimulationStep> {
        self.steps
            .iter()
            .filter(|s| s.is_fault == Some(true))
            .collect()
    }

    /// Steps whose action mentions `needle`
    pub fn steps_matching(&self, needle: &str) -> Vec<&SimulationStep> {
        self.steps
            .iter()
            .filter(|s| s.action.contains(needle))
            .collect()
    }
}
