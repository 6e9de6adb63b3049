//! Hybrid URL Classifier
//!
//! raw URL -> features -> {structural, pattern} -> fusion -> ScanResult
//!
//! Pure and synchronous. Storing or displaying the result is the caller's job.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::features::extract_features;
use super::fusion::{fuse, risk_score, verdict_for};
use super::pattern::score_pattern;
use super::structural::score_structural;
use crate::models::config::DetectorConfig;
use crate::models::types::{ModelScores, ScanResult};

/// Classify a URL. Never fails, unparseable input goes through the
/// invalid-URL path.
pub fn classify(url: &str, config: &DetectorConfig) -> ScanResult {
    let features = extract_features(url, config);

    // Random Forest: feature-based
    let structural = score_structural(&features);
    // LSTM: pattern-based
    let pattern = score_pattern(url, config);

    let fused = fuse(structural, pattern);
    let (verdict, confidence) = verdict_for(fused);

    debug!(
        "🛡️ {} -> {} (s={:.3}, p={:.3}, final={:.3})",
        url,
        verdict.as_str(),
        structural,
        pattern,
        fused
    );

    ScanResult {
        id: Uuid::new_v4(),
        url: url.to_string(),
        verdict,
        confidence,
        risk_score: risk_score(fused),
        timestamp: Utc::now(),
        features,
        scores: ModelScores {
            structural,
            pattern,
            fused,
        },
    }
}
