//! Errors surfaced by the simulation engines

use thiserror::Error;

use crate::models::process::{Pid, ProcessError};

/// Failure of an `execute` call or of engine construction
///
/// Input problems are detected before the first simulated tick, so an error
/// never comes with a partial result. `InvariantViolation` signals a logic
/// error inside an engine and aborts the run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid process P{pid}: {source}")]
    InvalidProcess {
        pid: Pid,
        #[source]
        source: ProcessError,
    },

    #[error("duplicate process id P{0}")]
    DuplicatePid(Pid),

    #[error("Process P{0} must have a deadline for EDF scheduling")]
    MissingDeadline(Pid),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("engine invariant violated: {0}")]
    InvariantViolation(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SimulationError {
    fn from(e: serde_json::Error) -> Self {
        SimulationError::Serialization(e.to_string())
    }
}
