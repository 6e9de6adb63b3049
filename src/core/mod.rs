//! Core Module - URL Scoring Engine
//!
//! Feature extraction, the two scorers and their fusion. Everything in here is
//! a pure function of its input and the injected `DetectorConfig`.

pub mod classifier;
pub mod features;
pub mod fusion;
pub mod pattern;
pub mod structural;

pub use classifier::*;
pub use features::*;
pub use fusion::*;
pub use pattern::*;
pub use structural::*;
