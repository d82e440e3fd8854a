//! Optimal (Belady) page replacement
//!
//! Evicts the resident page whose next reference lies farthest ahead in the
//! already-known sequence. A page that is never referenced again is evicted
//! at once, ahead of any page with a finite next use; among several such
//! pages the lowest frame id goes first.

use super::{run_replacement, ReplacementPolicy, VictimSelector};
use crate::error::SimulationError;
use crate::models::{Frame, FrameId, FutureReference, PageNumber, PagingDetail, SimulationResult};

/// Optimal replacement policy
///
/// Needs the whole reference string up front; it is a lower bound for the
/// other policies, not something a real kernel can run.
///
/// # Example
///
/// ```
/// use os_simulator_core_rs::paging::{OptimalReplacement, ReplacementPolicy};
///
/// let sequence = [7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1];
/// let result = OptimalReplacement.execute(&sequence, 3).unwrap();
///
/// assert_eq!(result.metric("page_faults"), Some(9.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalReplacement;

impl ReplacementPolicy for OptimalReplacement {
    fn name(&self) -> &'static str {
        "Optimal"
    }

    fn execute(
        &self,
        page_sequence: &[PageNumber],
        frame_count: usize,
    ) -> Result<SimulationResult, SimulationError> {
        run_replacement(self.name(), OptimalSelector, page_sequence, frame_count)
    }
}

/// Index of the next reference to `page` at or after `from`
fn next_use(sequence: &[PageNumber], page: PageNumber, from: usize) -> Option<usize> {
    sequence
        .get(from..)?
        .iter()
        .position(|&p| p == page)
        .map(|offset| from + offset)
}

struct OptimalSelector;

impl VictimSelector for OptimalSelector {
    fn select_victim(
        &mut self,
        frames: &mut [Frame],
        position: usize,
        sequence: &[PageNumber],
    ) -> Result<FrameId, SimulationError> {
        let mut farthest: Option<(usize, FrameId)> = None;

        for frame in frames.iter() {
            let Some(page) = frame.page_number() else {
                continue;
            };
            match next_use(sequence, page, position + 1) {
                None => return Ok(frame.frame_id()),
                Some(next) => {
                    if farthest.map_or(true, |(best, _)| next > best) {
                        farthest = Some((next, frame.frame_id()));
                    }
                }
            }
        }

        farthest.map(|(_, frame_id)| frame_id).ok_or_else(|| {
            SimulationError::InvariantViolation("Optimal found no resident page".to_string())
        })
    }

    fn detail(&self, _frames: &[Frame], sequence: &[PageNumber]) -> PagingDetail {
        PagingDetail::Optimal {
            future_references: sequence
                .iter()
                .enumerate()
                .map(|(step, &page)| FutureReference {
                    step,
                    page,
                    next_use: next_use(sequence, page, step + 1),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StepState, VisualizationData};

    #[test]
    fn test_next_use_lookup() {
        let sequence = [1, 2, 1, 3];
        assert_eq!(next_use(&sequence, 1, 1), Some(2));
        assert_eq!(next_use(&sequence, 2, 2), None);
    }

    #[test]
    fn test_never_used_again_evicted_first() {
        // At t=3 frames hold {1, 2}; 2 is never referenced again
        let result = OptimalReplacement.execute(&[1, 2, 1, 3, 1], 2).unwrap();
        match &result.execution_steps()[3].state_after {
            StepState::Memory(snapshot) => assert_eq!(snapshot.pages(), vec![Some(1), Some(3)]),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_future_reference_detail() {
        let result = OptimalReplacement.execute(&[4, 5, 4], 2).unwrap();
        match result.visualization_data() {
            VisualizationData::Paging {
                algorithm_specific: Some(PagingDetail::Optimal { future_references }),
                ..
            } => {
                assert_eq!(future_references[0].next_use, Some(2));
                assert_eq!(future_references[1].next_use, None);
                assert_eq!(future_references[2].next_use, None);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }
}
