//! PhishGuard Library
//!
//! Rule-based URL phishing classifier. Two heuristic scorers are fused into a
//! verdict with a confidence:
//! - Structural scorer ("RF" stage) over a 16-field feature record
//! - Pattern scorer ("LSTM" stage) over the raw URL string
//!
//! The engine is pure. History, persistence, the CLI and the HTTP API are
//! collaborators built on top of `classify`.

pub mod api;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::{
    classify, extract_features, fuse, parse_url, pattern_breakdown, risk_score, score_pattern,
    score_structural, structural_breakdown, verdict_for,
};
pub use models::config::{DetectorConfig, ServerConfig, MODEL_CONFIG_ENV};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{
    FeatureRecord, InvalidUrl, ModelScores, ScanResult, ScoreFactor, UrlFeatures, Verdict,
};
pub use utils::history::{HistoryStore, ScanHistory, ScanStats, TimelinePoint};
