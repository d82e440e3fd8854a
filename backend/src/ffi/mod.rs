//! Python bindings
//!
//! Thin wrappers only: every call converts its input, runs the engine, and
//! converts the result. No simulation logic lives here.

pub mod engines;
pub mod types;
