//! Type conversion utilities for FFI boundary
//!
//! Converts Python dicts into engine configuration and processes, and
//! results back into dicts.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::Time;
use crate::error::SimulationError;
use crate::metrics::MetricMap;
use crate::models::{IoOperation, PageNumber, Pid, Process};
use crate::scheduling::{MlfqConfig, Preemption, SchedulerConfig};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict
///
/// # Errors
/// Returns PyValueError if the field is missing; conversion errors from
/// `extract` propagate unchanged.
///
/// # Example
/// ```ignore
/// let burst: u64 = extract_required(&py_dict, "burst_time")?;
/// ```
pub(crate) fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Missing required field '{}'",
                key
            ))
        })?
        .extract()
}

/// Extract an optional field; `None` when missing or Python `None`
pub(crate) fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract()?)),
        _ => Ok(None),
    }
}

/// Map engine errors onto Python exceptions
///
/// Input and configuration problems become ValueError; an engine invariant
/// violation is a RuntimeError.
pub(crate) fn to_py_err(err: SimulationError) -> PyErr {
    match err {
        SimulationError::InvariantViolation(_) => {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(err.to_string())
        }
        _ => PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string()),
    }
}

// ========================================================================
// Configuration Parsing
// ========================================================================

fn preemption(dict: &Bound<'_, PyDict>) -> PyResult<Preemption> {
    let preemptive: Option<bool> = extract_optional(dict, "preemptive")?;
    Ok(if preemptive.unwrap_or(false) {
        Preemption::Preemptive
    } else {
        Preemption::NonPreemptive
    })
}

/// Parse a scheduler configuration dict
///
/// `type` is one of `fcfs`, `sjf`, `round_robin` (or `rr`), `priority`,
/// `mlfq`, `edf`, case-insensitive. Optional keys: `preemptive`,
/// `time_quantum`, `num_queues`, `time_quantums`, `aging_threshold`.
pub(crate) fn parse_scheduler_config(dict: &Bound<'_, PyDict>) -> PyResult<SchedulerConfig> {
    let kind: String = extract_required(dict, "type")?;

    let config = match kind.trim().to_ascii_lowercase().as_str() {
        "fcfs" => SchedulerConfig::Fcfs,
        "sjf" => SchedulerConfig::Sjf {
            preemption: preemption(dict)?,
        },
        "round_robin" | "roundrobin" | "rr" => SchedulerConfig::RoundRobin {
            time_quantum: extract_optional(dict, "time_quantum")?.unwrap_or(2),
        },
        "priority" => SchedulerConfig::Priority {
            preemption: preemption(dict)?,
        },
        "mlfq" => {
            let defaults = MlfqConfig::default();
            SchedulerConfig::Mlfq(MlfqConfig {
                num_queues: extract_optional(dict, "num_queues")?.unwrap_or(defaults.num_queues),
                time_quantums: extract_optional::<Vec<Time>>(dict, "time_quantums")?
                    .unwrap_or(defaults.time_quantums),
                aging_threshold: extract_optional(dict, "aging_threshold")?
                    .unwrap_or(defaults.aging_threshold),
            })
        }
        "edf" => SchedulerConfig::Edf,
        other => {
            return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Unknown scheduler type '{}'",
                other
            )))
        }
    };
    Ok(config)
}

/// Parse one process dict
///
/// Required: `pid`, `arrival_time`, `burst_time`. Optional: `priority`,
/// `deadline`, `memory_pages`, `io_operations`.
pub(crate) fn parse_process(dict: &Bound<'_, PyDict>) -> PyResult<Process> {
    let pid: Pid = extract_required(dict, "pid")?;
    let arrival_time: Time = extract_required(dict, "arrival_time")?;
    let burst_time: Time = extract_required(dict, "burst_time")?;

    let invalid = |e: crate::models::ProcessError| {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("Process P{}: {}", pid, e))
    };

    let mut process = Process::new(pid, arrival_time, burst_time).map_err(invalid)?;
    if let Some(priority) = extract_optional::<i32>(dict, "priority")? {
        process = process.with_priority(priority);
    }
    if let Some(deadline) = extract_optional::<Time>(dict, "deadline")? {
        process = process.with_deadline(deadline).map_err(invalid)?;
    }
    if let Some(pages) = extract_optional::<Vec<PageNumber>>(dict, "memory_pages")? {
        process = process.with_memory_pages(pages);
    }
    if let Some(ops) = extract_optional::<Vec<Bound<'_, PyDict>>>(dict, "io_operations")? {
        let ops = ops
            .iter()
            .map(parse_io_operation)
            .collect::<PyResult<Vec<_>>>()?;
        process = process.with_io_operations(ops).map_err(invalid)?;
    }
    Ok(process)
}

/// `{"start_time": .., "duration": .., "operation_type": ..}`; the type
/// defaults to disk
fn parse_io_operation(dict: &Bound<'_, PyDict>) -> PyResult<IoOperation> {
    let start_time: Time = extract_required(dict, "start_time")?;
    let duration: Time = extract_required(dict, "duration")?;
    Ok(match extract_optional::<String>(dict, "operation_type")? {
        Some(kind) => IoOperation::new(start_time, duration, kind),
        None => IoOperation::disk(start_time, duration),
    })
}

// ========================================================================
// Result Conversion
// ========================================================================

pub(crate) fn metrics_to_py<'py>(
    py: Python<'py>,
    metrics: &MetricMap,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    for (name, value) in metrics {
        dict.set_item(name, value)?;
    }
    Ok(dict)
}
