//! Core simulation primitives

pub mod clock;

pub use clock::{SimClock, Time};
