//! Utils Module - Shared Constants & Caller-Side State
//!
//! Scoring constants and the scan history kept by callers of the engine.

pub mod constants;
pub mod history;

pub use constants::*;
pub use history::*;
