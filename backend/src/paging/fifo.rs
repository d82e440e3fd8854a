//! FIFO (First-In-First-Out) page replacement
//!
//! Evicts the frame whose current content was loaded earliest.
//!
//! # Behavior
//!
//! - A queue of frame ids records load order
//! - Hits do not change the order
//! - The evicted frame re-enters at the tail once reloaded, so a frame's
//!   position reflects when its *current* page arrived

use std::collections::VecDeque;

use super::{run_replacement, ReplacementPolicy, VictimSelector};
use crate::error::SimulationError;
use crate::models::{Frame, FrameId, MemorySnapshot, PageNumber, PagingDetail, SimulationResult};

/// FIFO replacement policy
///
/// # Example
///
/// ```
/// use os_simulator_core_rs::paging::{FifoReplacement, ReplacementPolicy};
///
/// let sequence = [7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1];
/// let result = FifoReplacement.execute(&sequence, 3).unwrap();
///
/// assert_eq!(result.metric("page_faults"), Some(15.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoReplacement;

impl ReplacementPolicy for FifoReplacement {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn execute(
        &self,
        page_sequence: &[PageNumber],
        frame_count: usize,
    ) -> Result<SimulationResult, SimulationError> {
        run_replacement(self.name(), FifoSelector::default(), page_sequence, frame_count)
    }
}

#[derive(Debug, Default)]
struct FifoSelector {
    insertion_order: VecDeque<FrameId>,
}

impl VictimSelector for FifoSelector {
    fn on_load(&mut self, frame_id: FrameId) {
        self.insertion_order.push_back(frame_id);
    }

    fn select_victim(
        &mut self,
        _frames: &mut [Frame],
        _position: usize,
        _sequence: &[PageNumber],
    ) -> Result<FrameId, SimulationError> {
        self.insertion_order.pop_front().ok_or_else(|| {
            SimulationError::InvariantViolation(
                "FIFO insertion queue empty with a full frame pool".to_string(),
            )
        })
    }

    fn decorate(&self, snapshot: &mut MemorySnapshot) {
        snapshot.insertion_order = Some(self.insertion_order.iter().copied().collect());
    }

    fn detail(&self, _frames: &[Frame], _sequence: &[PageNumber]) -> PagingDetail {
        PagingDetail::Fifo {
            insertion_order: self.insertion_order.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StepState, VisualizationData};

    #[test]
    fn test_hit_does_not_refresh_position() {
        // 1 is hit before 3 arrives, but FIFO still evicts it first
        let result = FifoReplacement.execute(&[1, 2, 1, 3], 2).unwrap();
        let last = result.execution_steps().last().unwrap();
        match &last.state_after {
            StepState::Memory(snapshot) => {
                assert_eq!(snapshot.pages(), vec![Some(3), Some(2)]);
                assert_eq!(snapshot.insertion_order, Some(vec![1, 0]));
            }
            other => panic!("unexpected state: {:?}", other),
        }
        assert!(last.action.contains("replaced page 1 in frame 0"));
    }

    #[test]
    fn test_detail_reports_final_order() {
        let result = FifoReplacement.execute(&[1, 2, 3, 4], 3).unwrap();
        match result.visualization_data() {
            VisualizationData::Paging {
                algorithm_specific: Some(PagingDetail::Fifo { insertion_order }),
                ..
            } => assert_eq!(insertion_order, &vec![1, 2, 0]),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_belady_anomaly_sequence() {
        let sequence = [1, 2, 3, 4, 1, 2, 5, 1, 2, 3, 4, 5];
        let three = FifoReplacement.execute(&sequence, 3).unwrap();
        let four = FifoReplacement.execute(&sequence, 4).unwrap();
        assert_eq!(three.metric("page_faults"), Some(9.0));
        assert_eq!(four.metric("page_faults"), Some(10.0));
    }
}
