//! PyO3 wrappers for the engines
//!
//! Python code builds an engine once, then calls `execute` with its input.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{metrics_to_py, parse_process, parse_scheduler_config, to_py_err};
use crate::models::{PageNumber, SimulationResult};
use crate::paging::{PagingAlgorithm, ReplacementPolicy};
use crate::scheduling::Scheduler;

/// Python wrapper for a CPU scheduler
///
/// # Example (from Python)
///
/// ```python
/// from os_simulator_core_rs import Scheduler
///
/// rr = Scheduler({"type": "round_robin", "time_quantum": 2})
/// result = rr.execute([
///     {"pid": 1, "arrival_time": 0, "burst_time": 5},
///     {"pid": 2, "arrival_time": 1, "burst_time": 3},
/// ])
/// print(result.algorithm_name, result.metrics["average_waiting_time"])
/// ```
#[pyclass(name = "Scheduler")]
pub struct PyScheduler {
    inner: Box<dyn Scheduler>,
}

#[pymethods]
impl PyScheduler {
    /// Build a scheduler from a configuration dict
    ///
    /// # Errors
    ///
    /// Raises ValueError for an unknown type or invalid parameters.
    #[new]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let config = parse_scheduler_config(config)?;
        let inner = config.build().map_err(to_py_err)?;
        Ok(PyScheduler { inner })
    }

    #[getter]
    fn name(&self) -> String {
        self.inner.name()
    }

    /// Schedule a list of process dicts to completion
    fn execute(&self, processes: &Bound<'_, PyList>) -> PyResult<PySimulationResult> {
        let processes = processes
            .iter()
            .map(|item| parse_process(item.downcast::<PyDict>()?))
            .collect::<PyResult<Vec<_>>>()?;
        let inner = self.inner.execute(&processes).map_err(to_py_err)?;
        Ok(PySimulationResult { inner })
    }
}

/// Python wrapper for a page replacement policy
#[pyclass(name = "PageReplacement")]
pub struct PyPageReplacement {
    inner: Box<dyn ReplacementPolicy>,
}

#[pymethods]
impl PyPageReplacement {
    /// Build a policy by name: `fifo`, `lru`, `optimal` or `clock`
    #[new]
    fn new(algorithm: &str) -> PyResult<Self> {
        let algorithm: PagingAlgorithm = algorithm.parse().map_err(to_py_err)?;
        Ok(PyPageReplacement {
            inner: algorithm.build(),
        })
    }

    #[getter]
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn execute(
        &self,
        page_sequence: Vec<PageNumber>,
        frame_count: usize,
    ) -> PyResult<PySimulationResult> {
        let inner = self
            .inner
            .execute(&page_sequence, frame_count)
            .map_err(to_py_err)?;
        Ok(PySimulationResult { inner })
    }
}

/// Read-only view of a simulation result
#[pyclass(name = "SimulationResult")]
pub struct PySimulationResult {
    inner: SimulationResult,
}

#[pymethods]
impl PySimulationResult {
    #[getter]
    fn algorithm_name(&self) -> &str {
        self.inner.algorithm_name()
    }

    /// Metric name to value
    #[getter]
    fn metrics<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        metrics_to_py(py, self.inner.metrics())
    }

    #[getter]
    fn step_count(&self) -> usize {
        self.inner.execution_steps().len()
    }

    /// Step actions in order, for a textual trace
    fn actions(&self) -> Vec<String> {
        self.inner
            .execution_steps()
            .iter()
            .map(|step| step.action.clone())
            .collect()
    }

    /// SHA-256 of the canonical JSON form
    fn digest(&self) -> PyResult<String> {
        self.inner.digest().map_err(to_py_err)
    }

    /// Full result as JSON, for the presentation layer
    fn to_json(&self) -> PyResult<String> {
        self.inner.to_json().map_err(to_py_err)
    }
}
