//! LRU (Least Recently Used) page replacement
//!
//! Evicts the resident page with the oldest access time. Access times are
//! reference indices, refreshed on every hit and load, so they are unique
//! and the victim is never ambiguous.

use std::collections::BTreeMap;

use super::{run_replacement, ReplacementPolicy, VictimSelector};
use crate::error::SimulationError;
use crate::models::{Frame, FrameId, PageNumber, PagingDetail, SimulationResult};

/// LRU replacement policy
///
/// # Example
///
/// ```
/// use os_simulator_core_rs::paging::{LruReplacement, ReplacementPolicy};
///
/// let sequence = [7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1];
/// let result = LruReplacement.execute(&sequence, 3).unwrap();
///
/// assert_eq!(result.metric("page_faults"), Some(12.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LruReplacement;

impl ReplacementPolicy for LruReplacement {
    fn name(&self) -> &'static str {
        "LRU"
    }

    fn execute(
        &self,
        page_sequence: &[PageNumber],
        frame_count: usize,
    ) -> Result<SimulationResult, SimulationError> {
        run_replacement(self.name(), LruSelector, page_sequence, frame_count)
    }
}

struct LruSelector;

impl VictimSelector for LruSelector {
    fn select_victim(
        &mut self,
        frames: &mut [Frame],
        _position: usize,
        _sequence: &[PageNumber],
    ) -> Result<FrameId, SimulationError> {
        frames
            .iter()
            .filter(|f| !f.is_empty())
            .min_by_key(|f| f.last_access_time())
            .map(Frame::frame_id)
            .ok_or_else(|| {
                SimulationError::InvariantViolation("LRU found no resident page".to_string())
            })
    }

    fn detail(&self, frames: &[Frame], _sequence: &[PageNumber]) -> PagingDetail {
        PagingDetail::Lru {
            access_times: frames
                .iter()
                .map(|f| (f.frame_id(), f.last_access_time()))
                .collect::<BTreeMap<_, _>>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StepState;

    #[test]
    fn test_hit_refreshes_recency() {
        // 1 is touched at t=2, so 2 is least recent when 3 arrives
        let result = LruReplacement.execute(&[1, 2, 1, 3], 2).unwrap();
        match &result.execution_steps()[3].state_after {
            StepState::Memory(snapshot) => assert_eq!(snapshot.pages(), vec![Some(1), Some(3)]),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_single_frame_faults_on_every_change() {
        let result = LruReplacement.execute(&[1, 1, 2, 2, 1], 1).unwrap();
        assert_eq!(result.metric("page_faults"), Some(3.0));
        assert_eq!(result.metric("page_hits"), Some(2.0));
    }
}
