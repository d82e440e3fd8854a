//! CPU Scheduling Engine
//!
//! Decides, at every instant of simulated time, which process holds the
//! single CPU.
//!
//! # Overview
//!
//! All policies share:
//! - a simulated clock that advances by whole bursts (run-to-completion
//!   policies) or by single units (preemptive and quantum policies)
//! - a ready set of admitted, unfinished processes
//! - idle jumps: with nothing ready the clock moves straight to the next
//!   arrival, and no idle ticks are recorded
//! - response time taken at first dispatch only
//!
//! Policies:
//! 1. **FCFS**: (arrival_time, pid) order, never preempted
//! 2. **SJF**: (burst_time, ..) non-preemptive, or shortest remaining time
//! 3. **Round Robin**: fixed quantum, requeue at the tail
//! 4. **Priority**: (priority, ..) lower value first, optionally preemptive
//! 5. **MLFQ**: multi-level queues with demotion and aging
//! 6. **EDF**: earliest deadline first with miss detection
//!
//! # Example
//!
//! ```rust
//! use os_simulator_core_rs::models::Process;
//! use os_simulator_core_rs::scheduling::SchedulerConfig;
//!
//! let processes = vec![
//!     Process::new(1, 0, 5).unwrap(),
//!     Process::new(2, 1, 3).unwrap(),
//!     Process::new(3, 2, 8).unwrap(),
//!     Process::new(4, 3, 6).unwrap(),
//! ];
//!
//! let scheduler = SchedulerConfig::Fcfs.build().unwrap();
//! let result = scheduler.execute(&processes).unwrap();
//!
//! assert_eq!(result.metric("average_waiting_time"), Some(5.75));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::Time;
use crate::error::SimulationError;
use crate::models::{Process, SimulationResult};

pub mod edf;
pub mod fcfs;
pub mod mlfq;
pub mod priority;
pub mod round_robin;
pub(crate) mod run;
pub mod sjf;
pub(crate) mod table;

pub use edf::EdfScheduler;
pub use fcfs::FcfsScheduler;
pub use mlfq::MlfqScheduler;
pub use priority::PriorityScheduler;
pub use round_robin::RoundRobinScheduler;
pub use sjf::SjfScheduler;

/// A CPU scheduling policy
///
/// Policy parameters are fixed at construction; `execute` takes only the
/// workload. Implementations keep no state between calls, so running the
/// same instance twice on the same input yields identical results.
pub trait Scheduler: Send + Sync {
    /// Display name used in results
    fn name(&self) -> String;

    /// Configuration that rebuilds this scheduler
    fn config(&self) -> SchedulerConfig;

    /// Schedule `processes` to completion
    ///
    /// # Errors
    /// - `InvalidProcess` / `DuplicatePid` for a malformed workload
    /// - `MissingDeadline` for EDF when a process has no deadline
    /// - `InvariantViolation` if the engine reaches an impossible state
    fn execute(&self, processes: &[Process]) -> Result<SimulationResult, SimulationError>;
}

// ============================================================================
// Configuration
// ============================================================================

/// Whether a running process can be displaced before it finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preemption {
    #[default]
    NonPreemptive,
    Preemptive,
}

impl Preemption {
    pub fn is_preemptive(&self) -> bool {
        matches!(self, Preemption::Preemptive)
    }
}

impl fmt::Display for Preemption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preemption::NonPreemptive => f.write_str("Non-preemptive"),
            Preemption::Preemptive => f.write_str("Preemptive"),
        }
    }
}

fn default_time_quantum() -> Time {
    2
}

/// MLFQ parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlfqConfig {
    pub num_queues: usize,
    /// Quantum per level; an empty list means the defaults
    pub time_quantums: Vec<Time>,
    /// Ticks spent waiting before promotion by one level
    pub aging_threshold: Time,
}

impl Default for MlfqConfig {
    fn default() -> Self {
        Self {
            num_queues: 3,
            time_quantums: vec![2, 4, 8],
            aging_threshold: 10,
        }
    }
}

impl MlfqConfig {
    /// One quantum per level
    ///
    /// Missing levels take double the previous quantum; extra quantums are
    /// ignored.
    ///
    /// # Example
    /// ```
    /// use os_simulator_core_rs::scheduling::MlfqConfig;
    ///
    /// let config = MlfqConfig {
    ///     num_queues: 5,
    ///     time_quantums: vec![1, 3],
    ///     aging_threshold: 10,
    /// };
    /// assert_eq!(config.resolved_quantums(), vec![1, 3, 6, 12, 24]);
    /// ```
    pub fn resolved_quantums(&self) -> Vec<Time> {
        let mut quantums = if self.time_quantums.is_empty() {
            MlfqConfig::default().time_quantums
        } else {
            self.time_quantums.clone()
        };
        while quantums.len() < self.num_queues {
            let next = quantums.last().map_or(1, |&q| q.saturating_mul(2));
            quantums.push(next);
        }
        quantums.truncate(self.num_queues);
        quantums
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.num_queues == 0 {
            return Err(SimulationError::InvalidConfig(
                "MLFQ num_queues must be > 0".to_string(),
            ));
        }
        if self.time_quantums.iter().any(|&q| q == 0) {
            return Err(SimulationError::InvalidConfig(
                "MLFQ time quantums must be > 0".to_string(),
            ));
        }
        if self.aging_threshold == 0 {
            return Err(SimulationError::InvalidConfig(
                "MLFQ aging_threshold must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Scheduler selection and parameters
///
/// # Example
/// ```
/// use os_simulator_core_rs::scheduling::{Preemption, SchedulerConfig};
///
/// let config = SchedulerConfig::from_json(
///     r#"{"type": "Sjf", "preemption": "preemptive"}"#,
/// ).unwrap();
/// assert_eq!(config, SchedulerConfig::Sjf { preemption: Preemption::Preemptive });
/// assert_eq!(config.build().unwrap().name(), "SJF (Preemptive)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SchedulerConfig {
    Fcfs,
    Sjf {
        #[serde(default)]
        preemption: Preemption,
    },
    RoundRobin {
        #[serde(default = "default_time_quantum")]
        time_quantum: Time,
    },
    Priority {
        #[serde(default)]
        preemption: Preemption,
    },
    Mlfq(MlfqConfig),
    Edf,
}

impl SchedulerConfig {
    /// Validate parameters and instantiate the scheduler
    pub fn build(&self) -> Result<Box<dyn Scheduler>, SimulationError> {
        Ok(match self {
            SchedulerConfig::Fcfs => Box::new(FcfsScheduler),
            SchedulerConfig::Sjf { preemption } => Box::new(SjfScheduler::new(*preemption)),
            SchedulerConfig::RoundRobin { time_quantum } => {
                Box::new(RoundRobinScheduler::new(*time_quantum)?)
            }
            SchedulerConfig::Priority { preemption } => {
                Box::new(PriorityScheduler::new(*preemption))
            }
            SchedulerConfig::Mlfq(config) => Box::new(MlfqScheduler::new(config.clone())?),
            SchedulerConfig::Edf => Box::new(EdfScheduler),
        })
    }

    /// Convenience for `self.build()?.execute(..)`
    pub fn execute(&self, processes: &[Process]) -> Result<SimulationResult, SimulationError> {
        self.build()?.execute(processes)
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(json)?)
    }
}
