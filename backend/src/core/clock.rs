//! Simulated wall clock for the scheduling engines
//!
//! The clock only moves forward. Preemptive and quantum-driven policies
//! advance it one unit at a time; run-to-completion policies advance it by a
//! whole burst; every policy jumps it straight to the next arrival when the
//! ready set is empty, so idle time never produces ticks.

use serde::{Deserialize, Serialize};

/// Simulated time unit
pub type Time = u64;

/// Discrete simulated clock
///
/// # Example
/// ```
/// use os_simulator_core_rs::SimClock;
///
/// let mut clock = SimClock::new();
/// assert_eq!(clock.now(), 0);
///
/// clock.tick();
/// assert_eq!(clock.now(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimClock {
    now: Time,
}

impl SimClock {
    /// Create a clock positioned at time 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time
    pub fn now(&self) -> Time {
        self.now
    }

    /// Advance by exactly one time unit, returning the time the unit started
    ///
    /// # Example
    /// ```
    /// use os_simulator_core_rs::SimClock;
    ///
    /// let mut clock = SimClock::new();
    /// let start = clock.tick();
    /// assert_eq!(start, 0);
    /// assert_eq!(clock.now(), 1);
    /// ```
    pub fn tick(&mut self) -> Time {
        let start = self.now;
        self.now += 1;
        start
    }

    /// Advance by a whole burst, returning the time the burst started
    ///
    /// # Example
    /// ```
    /// use os_simulator_core_rs::SimClock;
    ///
    /// let mut clock = SimClock::new();
    /// clock.advance(5);
    /// assert_eq!(clock.now(), 5);
    /// ```
    pub fn advance(&mut self, units: Time) -> Time {
        let start = self.now;
        self.now += units;
        start
    }

    /// Jump forward to `target` (idle gap until the next arrival)
    ///
    /// Jumping to the present or the past is a no-op.
    ///
    /// # Example
    /// ```
    /// use os_simulator_core_rs::SimClock;
    ///
    /// let mut clock = SimClock::new();
    /// clock.jump_to(7);
    /// assert_eq!(clock.now(), 7);
    ///
    /// clock.jump_to(3);
    /// assert_eq!(clock.now(), 7);
    /// ```
    pub fn jump_to(&mut self, target: Time) {
        if target > self.now {
            self.now = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_returns_start_of_unit() {
        let mut clock = SimClock::new();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.tick(), 1);
        assert_eq!(clock.now(), 2);
    }

    #[test]
    fn test_advance_returns_start_of_burst() {
        let mut clock = SimClock::new();
        clock.jump_to(4);
        assert_eq!(clock.advance(3), 4);
        assert_eq!(clock.now(), 7);
    }
}
