//! Memory frame model
//!
//! One physical slot in the simulated frame pool. A frame is either empty or
//! holds exactly one page; a page is resident in at most one frame at a time.

use serde::{Deserialize, Serialize};

use crate::models::process::PageNumber;

/// Frame index within the pool (0..frame_count)
pub type FrameId = usize;

/// A memory frame
///
/// # Example
/// ```
/// use os_simulator_core_rs::models::Frame;
///
/// let mut frame = Frame::new(0);
/// assert!(frame.is_empty());
///
/// frame.load_page(7, 3);
/// assert_eq!(frame.page_number(), Some(7));
/// assert!(frame.reference_bit());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    frame_id: FrameId,
    page_number: Option<PageNumber>,
    last_access_time: usize,
    reference_bit: bool,
    dirty_bit: bool,
}

impl Frame {
    /// Create an empty frame
    pub fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            page_number: None,
            last_access_time: 0,
            reference_bit: false,
            dirty_bit: false,
        }
    }

    /// Build the pool `0..frame_count`
    pub fn pool(frame_count: usize) -> Vec<Frame> {
        (0..frame_count).map(Frame::new).collect()
    }

    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    pub fn page_number(&self) -> Option<PageNumber> {
        self.page_number
    }

    pub fn last_access_time(&self) -> usize {
        self.last_access_time
    }

    pub fn reference_bit(&self) -> bool {
        self.reference_bit
    }

    pub fn dirty_bit(&self) -> bool {
        self.dirty_bit
    }

    pub fn is_empty(&self) -> bool {
        self.page_number.is_none()
    }

    pub fn holds(&self, page: PageNumber) -> bool {
        self.page_number == Some(page)
    }

    /// Load `page` at `timestamp`, overwriting any resident page
    ///
    /// Loading counts as a reference: the reference bit is set and the dirty
    /// bit cleared.
    pub fn load_page(&mut self, page: PageNumber, timestamp: usize) {
        self.page_number = Some(page);
        self.last_access_time = timestamp;
        self.reference_bit = true;
        self.dirty_bit = false;
    }

    /// Record a hit at `timestamp`
    pub fn touch(&mut self, timestamp: usize) {
        self.last_access_time = timestamp;
    }

    pub fn set_reference_bit(&mut self, value: bool) {
        self.reference_bit = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_ids_are_sequential() {
        let pool = Frame::pool(3);
        let ids: Vec<_> = pool.iter().map(Frame::frame_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(pool.iter().all(Frame::is_empty));
    }

    #[test]
    fn test_load_page_sets_reference_bit() {
        let mut frame = Frame::new(1);
        frame.load_page(4, 9);
        assert!(frame.holds(4));
        assert_eq!(frame.last_access_time(), 9);
        assert!(frame.reference_bit());
        assert!(!frame.dirty_bit());
    }
}
