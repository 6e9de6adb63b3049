//! Fusion & Verdict
//!
//! Combines the structural and pattern scores with fixed weights and maps the
//! fused score to a verdict and confidence.
//!
//! - final >= 0.7       -> phishing,   confidence = min(95, final x 100)
//! - 0.4 <= final < 0.7 -> suspicious, confidence = final x 100
//! - final < 0.4        -> safe,       confidence = min(95, (1 - final) x 100)

use crate::models::types::Verdict;
use crate::utils::constants::{
    MAX_CONFIDENCE, PATTERN_WEIGHT, PHISHING_THRESHOLD, STRUCTURAL_WEIGHT, SUSPICIOUS_THRESHOLD,
};

/// Weighted average of both scorers (structural trusted more)
pub fn fuse(structural: f64, pattern: f64) -> f64 {
    structural * STRUCTURAL_WEIGHT + pattern * PATTERN_WEIGHT
}

/// Scale to a percentage, rounding half up
fn percent(value: f64) -> u32 {
    (value * 100.0).round().max(0.0) as u32
}

/// Verdict and confidence for a fused score
pub fn verdict_for(fused: f64) -> (Verdict, u8) {
    let cap = u32::from(MAX_CONFIDENCE);
    if fused >= PHISHING_THRESHOLD {
        (Verdict::Phishing, percent(fused).min(cap) as u8)
    } else if fused >= SUSPICIOUS_THRESHOLD {
        // Below the phishing threshold, so at most 70
        (Verdict::Suspicious, percent(fused) as u8)
    } else {
        (Verdict::Safe, percent(1.0 - fused).min(cap) as u8)
    }
}

/// Risk score: fused x 100, NOT clamped to 100
pub fn risk_score(fused: f64) -> u32 {
    percent(fused)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fusion_weights() {
        assert!((fuse(1.0, 0.0) - 0.6).abs() < 1e-12);
        assert!((fuse(0.0, 1.0) - 0.4).abs() < 1e-12);
        assert!((fuse(0.5, 0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_bands() {
        assert_eq!(verdict_for(0.7), (Verdict::Phishing, 70));
        assert_eq!(verdict_for(0.69), (Verdict::Suspicious, 69));
        assert_eq!(verdict_for(0.4), (Verdict::Suspicious, 40));
        assert_eq!(verdict_for(0.39), (Verdict::Safe, 61));
    }

    #[test]
    fn test_confidence_caps_at_95() {
        assert_eq!(verdict_for(0.0), (Verdict::Safe, 95));
        assert_eq!(verdict_for(0.99), (Verdict::Phishing, 95));
        assert_eq!(verdict_for(1.4), (Verdict::Phishing, 95));
    }

    #[test]
    fn test_risk_score_is_unclamped() {
        assert_eq!(risk_score(0.0), 0);
        assert_eq!(risk_score(0.456), 46);
        assert_eq!(risk_score(1.25), 125);
    }
}
