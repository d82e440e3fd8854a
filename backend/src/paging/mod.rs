//! Page Replacement Engine
//!
//! Replays a page reference string against a fixed pool of frames.
//!
//! # Overview
//!
//! Every reference is serviced the same way regardless of policy:
//! - **Hit**: the page is resident; its frame's access time is refreshed
//! - **Fault**: the page is loaded into the first empty frame, or into a
//!   victim frame chosen by the policy once the pool is full
//!
//! Policies differ only in how they pick the victim:
//! 1. **FIFO**: frame whose current content was loaded earliest
//! 2. **LRU**: frame with the oldest access time
//! 3. **Optimal**: page used farthest in the future (never-again first)
//! 4. **Clock**: second-chance sweep over reference bits
//!
//! The simulated timestamp of each reference is its index in the string.
//!
//! # Example
//!
//! ```rust
//! use os_simulator_core_rs::paging::{LruReplacement, ReplacementPolicy};
//!
//! let result = LruReplacement.execute(&[1, 2, 1, 3, 2], 2).unwrap();
//! assert_eq!(result.metric("page_faults"), Some(4.0));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::Time;
use crate::error::SimulationError;
use crate::metrics::{MetricMap, PagingMetrics};
use crate::models::{
    ExecutionTrace, Frame, FrameId, InputParameters, MemorySnapshot, PageNumber, PagingDetail,
    SimulationResult, StepState, VisualizationData,
};

pub mod clock;
pub mod fifo;
pub mod lru;
pub mod optimal;

pub use clock::ClockReplacement;
pub use fifo::FifoReplacement;
pub use lru::LruReplacement;
pub use optimal::OptimalReplacement;

/// A page replacement policy
///
/// Implementations hold no state between calls: each `execute` builds its
/// own frame pool and trace, so one instance can be shared freely.
pub trait ReplacementPolicy: Send + Sync {
    /// Display name used in results
    fn name(&self) -> &'static str;

    /// Replay `page_sequence` against `frame_count` frames
    ///
    /// # Errors
    /// `SimulationError::InvalidConfig` when `frame_count` is zero.
    fn execute(
        &self,
        page_sequence: &[PageNumber],
        frame_count: usize,
    ) -> Result<SimulationResult, SimulationError>;
}

/// Per-run victim selection state
///
/// The shared reference loop owns the frames and calls back into the
/// selector at each decision point.
pub(crate) trait VictimSelector {
    /// A resident page was referenced again
    fn on_hit(&mut self, _frame: &mut Frame) {}

    /// A page was loaded into `frame_id` (empty or freshly evicted)
    fn on_load(&mut self, _frame_id: FrameId) {}

    /// Pick the frame to overwrite; every frame is occupied
    fn select_victim(
        &mut self,
        frames: &mut [Frame],
        position: usize,
        sequence: &[PageNumber],
    ) -> Result<FrameId, SimulationError>;

    /// Add policy bookkeeping to a frame snapshot
    fn decorate(&self, _snapshot: &mut MemorySnapshot) {}

    /// The reference at the current position has been fully serviced
    fn after_reference(&mut self) {}

    /// Final policy-specific visualization detail
    fn detail(&self, frames: &[Frame], sequence: &[PageNumber]) -> PagingDetail;
}

fn snapshot<S: VictimSelector>(frames: &[Frame], selector: &S) -> MemorySnapshot {
    let mut snapshot = MemorySnapshot::of(frames);
    selector.decorate(&mut snapshot);
    snapshot
}

/// Shared reference loop for all replacement policies
pub(crate) fn run_replacement<S: VictimSelector>(
    name: &str,
    mut selector: S,
    page_sequence: &[PageNumber],
    frame_count: usize,
) -> Result<SimulationResult, SimulationError> {
    if frame_count == 0 {
        return Err(SimulationError::InvalidConfig(
            "frame_count must be > 0".to_string(),
        ));
    }

    let input_parameters = InputParameters::Paging {
        page_sequence: page_sequence.to_vec(),
        frame_count,
    };

    if page_sequence.is_empty() {
        return Ok(SimulationResult::empty(
            name.to_string(),
            VisualizationData::empty_paging(),
            input_parameters,
        ));
    }

    let mut frames = Frame::pool(frame_count);
    let mut trace = ExecutionTrace::new();
    let mut frame_states_timeline = Vec::with_capacity(page_sequence.len());
    let mut hit_miss_pattern = Vec::with_capacity(page_sequence.len());
    let mut page_faults = 0;

    for (position, &page) in page_sequence.iter().enumerate() {
        let before = snapshot(&frames, &selector);

        let resident = frames.iter().position(|f| f.holds(page));
        let (hit, action) = if let Some(index) = resident {
            let frame = &mut frames[index];
            frame.touch(position);
            selector.on_hit(frame);
            (true, format!("Access page {} - HIT", page))
        } else {
            page_faults += 1;
            match frames.iter().position(Frame::is_empty) {
                Some(free) => {
                    frames[free].load_page(page, position);
                    selector.on_load(free);
                    (false, format!("Access page {} - FAULT", page))
                }
                None => {
                    let victim = selector.select_victim(&mut frames, position, page_sequence)?;
                    let frame = frames.get_mut(victim).ok_or_else(|| {
                        SimulationError::InvariantViolation(format!(
                            "{} selected victim frame {} outside pool of {}",
                            name, victim, frame_count
                        ))
                    })?;
                    let evicted = frame.page_number();
                    frame.load_page(page, position);
                    selector.on_load(victim);
                    log::debug!(
                        "{}: t={} page {} evicts {:?} from frame {}",
                        name,
                        position,
                        page,
                        evicted,
                        victim
                    );
                    let action = match evicted {
                        Some(old) => format!(
                            "Access page {} - FAULT (replaced page {} in frame {})",
                            page, old, victim
                        ),
                        None => format!("Access page {} - FAULT", page),
                    };
                    (false, action)
                }
            }
        };
        selector.after_reference();

        let after = snapshot(&frames, &selector);
        log::trace!("{}: t={} {}", name, position, action);

        trace
            .record(
                position as Time,
                action,
                StepState::Memory(before),
                StepState::Memory(after.clone()),
            )
            .as_reference(hit);
        frame_states_timeline.push(after);
        hit_miss_pattern.push(hit);
    }

    let mut metrics = MetricMap::new();
    PagingMetrics::new(page_sequence.len(), page_faults).write_into(&mut metrics);

    let visualization_data = VisualizationData::Paging {
        frame_states_timeline,
        hit_miss_pattern,
        algorithm_specific: Some(selector.detail(&frames, page_sequence)),
    };

    Ok(SimulationResult::new(
        name.to_string(),
        trace,
        metrics,
        visualization_data,
        input_parameters,
    ))
}

// ============================================================================
// Configuration
// ============================================================================

/// Replacement policy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PagingAlgorithm {
    Fifo,
    Lru,
    Optimal,
    Clock,
}

impl PagingAlgorithm {
    pub const ALL: [PagingAlgorithm; 4] = [
        PagingAlgorithm::Fifo,
        PagingAlgorithm::Lru,
        PagingAlgorithm::Optimal,
        PagingAlgorithm::Clock,
    ];

    /// Instantiate the policy
    pub fn build(&self) -> Box<dyn ReplacementPolicy> {
        match self {
            PagingAlgorithm::Fifo => Box::new(FifoReplacement),
            PagingAlgorithm::Lru => Box::new(LruReplacement),
            PagingAlgorithm::Optimal => Box::new(OptimalReplacement),
            PagingAlgorithm::Clock => Box::new(ClockReplacement),
        }
    }

    /// Convenience for `self.build().execute(..)`
    pub fn execute(
        &self,
        page_sequence: &[PageNumber],
        frame_count: usize,
    ) -> Result<SimulationResult, SimulationError> {
        self.build().execute(page_sequence, frame_count)
    }
}

impl fmt::Display for PagingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.build().name())
    }
}

impl FromStr for PagingAlgorithm {
    type Err = SimulationError;

    /// Case-insensitive policy name
    ///
    /// # Example
    /// ```
    /// use os_simulator_core_rs::paging::PagingAlgorithm;
    ///
    /// assert_eq!("lru".parse::<PagingAlgorithm>().unwrap(), PagingAlgorithm::Lru);
    /// assert_eq!("Second-Chance".parse::<PagingAlgorithm>().unwrap(), PagingAlgorithm::Clock);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(PagingAlgorithm::Fifo),
            "lru" => Ok(PagingAlgorithm::Lru),
            "optimal" | "opt" | "belady" => Ok(PagingAlgorithm::Optimal),
            "clock" | "second-chance" | "second_chance" => Ok(PagingAlgorithm::Clock),
            other => Err(SimulationError::InvalidConfig(format!(
                "unknown page replacement algorithm '{}'",
                other
            ))),
        }
    }
}
