//! Models Module - Data Structures & Configuration
//!
//! Single source of truth for result types, errors and configuration.
//! No hardcoded list or threshold lives outside `utils::constants`.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
