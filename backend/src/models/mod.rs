//! Domain models for the simulator

pub mod frame;
pub mod gantt;
pub mod process;
pub mod result;
pub mod step;

// Re-exports
pub use frame::{Frame, FrameId};
pub use gantt::{GanttChart, GanttEntry};
pub use process::{IoOperation, PageNumber, Pid, Process, ProcessError};
pub use result::{
    FutureReference, InputParameters, PagingDetail, ResultSummary, SimulationResult,
    VisualizationData,
};
pub use step::{
    CpuSnapshot, ExecutionTrace, FrameSnapshot, MemorySnapshot, SimulationStep, StepState,
};
