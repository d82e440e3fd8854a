//! Simulation result - the only output contract of the engines
//!
//! A `SimulationResult` is assembled once at the end of an `execute` call
//! and never changes afterwards. Presentation code reads:
//! - `metrics()` for tabular display
//! - `visualization_data()` for charts (Gantt chart or frame timeline)
//! - `execution_steps()` for a textual trace
//!
//! # Critical Invariants
//!
//! - **Determinism**: identical inputs produce identical results, and so an
//!   identical `digest()`
//! - **Trace numbering**: every step's `step_number` equals its index
//! - **No wall-clock data**: nothing in a result depends on when it ran

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::error::SimulationError;
use crate::metrics::{MetricMap, ProcessStats};
use crate::models::frame::FrameId;
use crate::models::gantt::GanttEntry;
use crate::models::process::{PageNumber, Pid, Process};
use crate::models::step::{ExecutionTrace, MemorySnapshot, SimulationStep};
use crate::scheduling::SchedulerConfig;

// ============================================================================
// Visualization Payload
// ============================================================================

/// Next use of the page referenced at `step` (Optimal lookahead)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureReference {
    pub step: usize,
    pub page: PageNumber,
    /// Index of the next reference to the same page, `None` if never again
    pub next_use: Option<usize>,
}

/// Replacement-policy specific visualization detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PagingDetail {
    Fifo {
        insertion_order: Vec<FrameId>,
    },
    Lru {
        access_times: BTreeMap<FrameId, usize>,
    },
    Optimal {
        future_references: Vec<FutureReference>,
    },
    Clock {
        clock_hand_positions: Vec<FrameId>,
        reference_bits: BTreeMap<FrameId, bool>,
    },
}

/// Algorithm-specific chart payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualizationData {
    Schedule {
        gantt_chart: Vec<GanttEntry>,
        process_stats: Vec<ProcessStats>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        missed_deadlines: Vec<Pid>,
    },
    Paging {
        frame_states_timeline: Vec<MemorySnapshot>,
        hit_miss_pattern: Vec<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        algorithm_specific: Option<PagingDetail>,
    },
}

impl VisualizationData {
    pub fn empty_schedule() -> Self {
        VisualizationData::Schedule {
            gantt_chart: Vec::new(),
            process_stats: Vec::new(),
            missed_deadlines: Vec::new(),
        }
    }

    pub fn empty_paging() -> Self {
        VisualizationData::Paging {
            frame_states_timeline: Vec::new(),
            hit_miss_pattern: Vec::new(),
            algorithm_specific: None,
        }
    }

    /// Gantt entries, empty for paging results
    pub fn gantt_chart(&self) -> &[GanttEntry] {
        match self {
            VisualizationData::Schedule { gantt_chart, .. } => gantt_chart,
            VisualizationData::Paging { .. } => &[],
        }
    }

    /// Per-process outcomes, empty for paging results
    pub fn process_stats(&self) -> &[ProcessStats] {
        match self {
            VisualizationData::Schedule { process_stats, .. } => process_stats,
            VisualizationData::Paging { .. } => &[],
        }
    }

    /// Hit/miss pattern, empty for scheduling results
    pub fn hit_miss_pattern(&self) -> &[bool] {
        match self {
            VisualizationData::Paging {
                hit_miss_pattern, ..
            } => hit_miss_pattern,
            VisualizationData::Schedule { .. } => &[],
        }
    }
}

// ============================================================================
// Input Provenance
// ============================================================================

/// Snapshot of the inputs a result was produced from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputParameters {
    Paging {
        page_sequence: Vec<PageNumber>,
        frame_count: usize,
    },
    Scheduling {
        process_count: usize,
        scheduler: SchedulerConfig,
        processes: Vec<Process>,
    },
}

// ============================================================================
// Result
// ============================================================================

/// Complete, immutable outcome of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    algorithm_name: String,
    execution_steps: ExecutionTrace,
    metrics: MetricMap,
    visualization_data: VisualizationData,
    input_parameters: InputParameters,
}

/// Condensed view of a result for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub algorithm: String,
    pub total_steps: usize,
    pub key_metrics: MetricMap,
    pub input_parameters: InputParameters,
}

impl SimulationResult {
    pub(crate) fn new(
        algorithm_name: String,
        execution_steps: ExecutionTrace,
        metrics: MetricMap,
        visualization_data: VisualizationData,
        input_parameters: InputParameters,
    ) -> Self {
        Self {
            algorithm_name,
            execution_steps,
            metrics,
            visualization_data,
            input_parameters,
        }
    }

    /// Result for an empty workload: no steps, no metrics
    pub(crate) fn empty(
        algorithm_name: String,
        visualization_data: VisualizationData,
        input_parameters: InputParameters,
    ) -> Self {
        Self::new(
            algorithm_name,
            ExecutionTrace::new(),
            MetricMap::new(),
            visualization_data,
            input_parameters,
        )
    }

    pub fn algorithm_name(&self) -> &str {
        &self.algorithm_name
    }

    pub fn execution_steps(&self) -> &[SimulationStep] {
        self.execution_steps.steps()
    }

    /// Trace with query helpers
    pub fn trace(&self) -> &ExecutionTrace {
        &self.execution_steps
    }

    pub fn metrics(&self) -> &MetricMap {
        &self.metrics
    }

    /// Look up one metric by name
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    pub fn visualization_data(&self) -> &VisualizationData {
        &self.visualization_data
    }

    pub fn input_parameters(&self) -> &InputParameters {
        &self.input_parameters
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            algorithm: self.algorithm_name.clone(),
            total_steps: self.execution_steps.len(),
            key_metrics: self.metrics.clone(),
            input_parameters: self.input_parameters.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// SHA-256 of the canonical JSON form
    ///
    /// Two runs with identical inputs always share a digest.
    pub fn digest(&self) -> Result<String, SimulationError> {
        canonical_digest(self)
    }
}

/// SHA-256 over canonical (sorted-key) JSON
pub fn canonical_digest<T: Serialize>(value: &T) -> Result<String, SimulationError> {
    use serde_json::Value;

    let value = serde_json::to_value(value)?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
