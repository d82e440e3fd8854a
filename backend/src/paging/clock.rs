//! Clock (second chance) page replacement
//!
//! A single hand sweeps the frames in a circle. A frame whose reference bit
//! is set gets a second chance: the bit is cleared and the hand moves on. The
//! first frame found with a clear bit is the victim, and the hand then
//! advances one more position for the next fault.
//!
//! Loading a page sets its reference bit, as does every hit. Filling an empty
//! frame does not move the hand.

use std::collections::BTreeMap;

use super::{run_replacement, ReplacementPolicy, VictimSelector};
use crate::error::SimulationError;
use crate::models::{Frame, FrameId, MemorySnapshot, PageNumber, PagingDetail, SimulationResult};

/// Clock replacement policy
///
/// # Example
///
/// ```
/// use os_simulator_core_rs::paging::{ClockReplacement, ReplacementPolicy};
///
/// let result = ClockReplacement.execute(&[1, 2, 3, 1, 4], 3).unwrap();
/// assert_eq!(result.metric("page_faults"), Some(4.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockReplacement;

impl ReplacementPolicy for ClockReplacement {
    fn name(&self) -> &'static str {
        "Clock"
    }

    fn execute(
        &self,
        page_sequence: &[PageNumber],
        frame_count: usize,
    ) -> Result<SimulationResult, SimulationError> {
        run_replacement(self.name(), ClockSelector::default(), page_sequence, frame_count)
    }
}

#[derive(Debug, Default)]
struct ClockSelector {
    hand: FrameId,
    history: Vec<FrameId>,
}

impl VictimSelector for ClockSelector {
    fn on_hit(&mut self, frame: &mut Frame) {
        frame.set_reference_bit(true);
    }

    fn select_victim(
        &mut self,
        frames: &mut [Frame],
        _position: usize,
        _sequence: &[PageNumber],
    ) -> Result<FrameId, SimulationError> {
        let len = frames.len();
        if len == 0 {
            return Err(SimulationError::InvariantViolation(
                "Clock sweep over an empty frame pool".to_string(),
            ));
        }

        // Terminates within two revolutions: the first pass clears every bit
        loop {
            let frame = &mut frames[self.hand];
            let current = self.hand;
            self.hand = (self.hand + 1) % len;
            if frame.reference_bit() {
                frame.set_reference_bit(false);
            } else {
                return Ok(current);
            }
        }
    }

    fn decorate(&self, snapshot: &mut MemorySnapshot) {
        snapshot.clock_hand = Some(self.hand);
    }

    fn after_reference(&mut self) {
        self.history.push(self.hand);
    }

    fn detail(&self, frames: &[Frame], _sequence: &[PageNumber]) -> PagingDetail {
        PagingDetail::Clock {
            clock_hand_positions: self.history.clone(),
            reference_bits: frames
                .iter()
                .map(|f| (f.frame_id(), f.reference_bit()))
                .collect::<BTreeMap<_, _>>(),
        }
    }
}
