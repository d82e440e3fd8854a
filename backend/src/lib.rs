//! OS Simulator Core - Rust Engine
//!
//! Deterministic simulation of classical CPU scheduling and page replacement
//! policies, producing an auditable step trace and standard metrics.
//!
//! # Architecture
//!
//! - **core**: Simulated clock
//! - **models**: Domain types (Process, Frame, steps, Gantt chart, results)
//! - **metrics**: Scheduling, deadline and paging metrics
//! - **paging**: Page replacement engine (FIFO, LRU, Optimal, Clock)
//! - **scheduling**: CPU scheduling engine (FCFS, SJF, RR, Priority, MLFQ, EDF)
//! - **compare**: Policy duels and the hybrid scheduling + paging run
//! - **request**: JSON-driven entry point
//!
//! # Critical Invariants
//!
//! 1. Identical inputs always produce identical results (no randomness, no
//!    wall-clock data)
//! 2. Engines keep no state between `execute` calls; caller inputs are never
//!    mutated
//! 3. Invalid input is rejected before the first simulated tick
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod compare;
pub mod core;
pub mod error;
pub mod metrics;
pub mod models;
pub mod paging;
pub mod request;
pub mod scheduling;

// Re-exports for convenience
pub use compare::{duel_paging, duel_scheduling, run_hybrid, DuelReport, HybridReport, Verdict};
pub use core::{SimClock, Time};
pub use error::SimulationError;
pub use metrics::{MetricMap, ProcessStats};
pub use models::{
    ExecutionTrace, Frame, GanttEntry, IoOperation, Pid, Process, ProcessError, SimulationResult,
    SimulationStep, VisualizationData,
};
pub use paging::{PagingAlgorithm, ReplacementPolicy};
pub use request::SimulationRequest;
pub use scheduling::{MlfqConfig, Preemption, Scheduler, SchedulerConfig};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn os_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::engines::PyScheduler>()?;
    m.add_class::<ffi::engines::PyPageReplacement>()?;
    m.add_class::<ffi::engines::PySimulationResult>()?;
    Ok(())
}
