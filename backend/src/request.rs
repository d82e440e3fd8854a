//! JSON-driven entry point
//!
//! A `SimulationRequest` bundles an engine selection with its input, so a
//! collaborator can describe a whole run as one document:
//!
//! ```json
//! {"kind": "scheduling",
//!  "scheduler": {"type": "RoundRobin", "time_quantum": 2},
//!  "processes": [{"pid": 1, "arrival_time": 0, "burst_time": 5}]}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::models::{PageNumber, Process, SimulationResult};
use crate::paging::PagingAlgorithm;
use crate::scheduling::SchedulerConfig;

/// One simulation run, fully specified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulationRequest {
    Scheduling {
        scheduler: SchedulerConfig,
        processes: Vec<Process>,
    },
    Paging {
        algorithm: PagingAlgorithm,
        page_sequence: Vec<PageNumber>,
        frame_count: usize,
    },
}

impl SimulationRequest {
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Build the engine and execute it
    ///
    /// Processes read from JSON are validated here, since deserialization
    /// bypasses the `Process` constructors.
    pub fn run(&self) -> Result<SimulationResult, SimulationError> {
        match self {
            SimulationRequest::Scheduling {
                scheduler,
                processes,
            } => scheduler.execute(processes),
            SimulationRequest::Paging {
                algorithm,
                page_sequence,
                frame_count,
            } => algorithm.execute(page_sequence, *frame_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessError;

    #[test]
    fn test_scheduling_request_from_json() {
        let request = SimulationRequest::from_json(
            r#"{
                "kind": "scheduling",
                "scheduler": {"type": "RoundRobin", "time_quantum": 2},
                "processes": [
                    {"pid": 1, "arrival_time": 0, "burst_time": 5},
                    {"pid": 2, "arrival_time": 1, "burst_time": 3}
                ]
            }"#,
        )
        .unwrap();
        let result = request.run().unwrap();
        assert_eq!(result.algorithm_name(), "Round Robin (q=2)");
        assert_eq!(result.metric("total_execution_time"), Some(8.0));
    }

    #[test]
    fn test_paging_request_from_json() {
        let request = SimulationRequest::from_json(
            r#"{"kind": "paging", "algorithm": "Clock",
                "page_sequence": [1, 2, 1], "frame_count": 2}"#,
        )
        .unwrap();
        let result = request.run().unwrap();
        assert_eq!(result.metric("page_hits"), Some(1.0));
    }

    #[test]
    fn test_invalid_process_from_json_rejected_at_run() {
        let request = SimulationRequest::from_json(
            r#"{"kind": "scheduling", "scheduler": {"type": "Fcfs"},
                "processes": [{"pid": 7, "arrival_time": 0, "burst_time": 0}]}"#,
        )
        .unwrap();
        assert_eq!(
            request.run().unwrap_err(),
            SimulationError::InvalidProcess {
                pid: 7,
                source: ProcessError::InvalidBurst
            }
        );
    }
}
