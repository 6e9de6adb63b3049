//! Constants Module - Single Source of Truth
//!
//! Scoring weights, verdict thresholds and the default rule lists live here.
//! The lists are only defaults: the engine reads them through `DetectorConfig`
//! so they can be swapped without touching scoring code. The numeric constants
//! are calibrated together and are NOT configurable.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "PhishGuard";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Label shown by display collaborators for the scoring method
pub const DETECTION_METHOD: &str = "Hybrid RF + LSTM";

// ============================================
// FEATURE EXTRACTION
// ============================================

/// Scheme prefix that marks a URL as already carrying a scheme
pub const SCHEME_PREFIX: &str = "http";

/// Prefix added to scheme-less input before parsing
pub const DEFAULT_SCHEME: &str = "https://";

/// Hostname label count above which a subdomain is assumed
pub const SUBDOMAIN_LABEL_THRESHOLD: usize = 2;

// ============================================
// STRUCTURAL SCORER ("Random Forest")
// ============================================

/// Number of rule groups; the structural score is sum / count
pub const STRUCTURAL_GROUP_COUNT: usize = 7;

pub mod structural_weights {
    // Group 1: URL length
    pub const LONG_URL_CHARS: usize = 75;
    pub const MEDIUM_URL_CHARS: usize = 50;
    pub const LONG_URL: f64 = 0.7;
    pub const MEDIUM_URL: f64 = 0.4;
    pub const SHORT_URL: f64 = 0.1;

    // Group 2: transport security
    pub const NO_HTTPS: f64 = 0.5;
    pub const IP_HOST: f64 = 0.8;
    pub const EXPLICIT_PORT: f64 = 0.6;

    // Group 3: suspicious syntax
    pub const AT_SYMBOL: f64 = 0.9;
    pub const DOUBLE_SLASH: f64 = 0.7;
    pub const MAX_HYPHENS: usize = 3;
    pub const MANY_HYPHENS: f64 = 0.6;

    // Group 4: special character ratio
    pub const HIGH_SPECIAL_RATIO: f64 = 0.15;
    pub const MEDIUM_SPECIAL_RATIO: f64 = 0.08;
    pub const HIGH_SPECIAL: f64 = 0.8;
    pub const MEDIUM_SPECIAL: f64 = 0.5;

    // Group 5: domain shape
    pub const LONG_DOMAIN_CHARS: usize = 40;
    pub const LONG_DOMAIN: f64 = 0.7;
    pub const MAX_DOTS: usize = 4;
    pub const MANY_DOTS: f64 = 0.6;
    pub const BRAND_IN_SUBDOMAIN: f64 = 0.9;

    // Group 6: phishing keywords
    pub const KEYWORD_NO_HTTPS: f64 = 0.9;
    pub const KEYWORD_HTTPS: f64 = 0.4;

    // Group 7: unparseable URL
    pub const INVALID_URL: f64 = 1.0;
}

// ============================================
// PATTERN SCORER ("LSTM")
// ============================================

pub mod pattern_weights {
    /// Minimum length of a same-character run
    pub const MIN_REPEAT_RUN: usize = 3;
    /// Runs must occur more than this many times
    pub const MAX_REPEAT_RUNS: usize = 2;
    pub const REPETITION: f64 = 0.3;

    /// Minimum length of an alphabetic run considered for randomness
    pub const MIN_RANDOM_RUN: usize = 10;
    pub const RANDOM_UNIQUE_RATIO: f64 = 0.7;
    pub const RANDOM_RUN: f64 = 0.2;

    pub const HOMOGRAPH: f64 = 0.9;
    pub const SUSPICIOUS_TLD: f64 = 0.6;
    pub const SHORTENER: f64 = 0.4;

    pub const ENCODED_SEPARATOR: f64 = 0.3;
    pub const MAX_PERCENT_SIGNS: usize = 3;
    pub const HEAVY_ENCODING: f64 = 0.5;

    pub const SEQUENTIAL_TOKEN: f64 = 0.1;

    /// Upper clamp of the pattern score
    pub const MAX_SCORE: f64 = 1.0;
}

// ============================================
// FUSION & VERDICT
// ============================================

/// Weight of the structural score (trusted more)
pub const STRUCTURAL_WEIGHT: f64 = 0.6;
/// Weight of the pattern score
pub const PATTERN_WEIGHT: f64 = 0.4;

/// Fused score at or above which a URL is phishing
pub const PHISHING_THRESHOLD: f64 = 0.7;
/// Fused score at or above which a URL is suspicious
pub const SUSPICIOUS_THRESHOLD: f64 = 0.4;
/// Confidence ceiling for safe and phishing verdicts
pub const MAX_CONFIDENCE: u8 = 95;

// ============================================
// HISTORY
// ============================================

/// Scan history capacity (most recent first)
pub const HISTORY_CAPACITY: usize = 50;

/// Hourly buckets in the timeline feed
pub const TIMELINE_BUCKETS: usize = 7;

/// Display URLs longer than this are truncated
pub const DISPLAY_URL_CHARS: usize = 50;

// ============================================
// API LIMITS
// ============================================

/// Maximum URLs per batch request
pub const MAX_BATCH_SIZE: usize = 100;

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;

/// Default requests per minute per client
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Concurrent requests served by the API
pub const MAX_CONCURRENT_REQUESTS: usize = 256;

// ============================================
// DEFAULT RULE LISTS
// ============================================

/// Phishing keywords, matched case-insensitively anywhere in the URL
pub const DEFAULT_PHISHING_KEYWORDS: &[&str] = &[
    "login", "signin", "account", "verify", "secure", "update", "confirm", "banking",
];

/// Brand names, matched case-insensitively in the hostname
pub const DEFAULT_BRAND_NAMES: &[&str] = &[
    "paypal", "amazon", "microsoft", "apple", "google", "facebook",
];

/// Lookalike spellings using Cyrillic characters
pub const DEFAULT_HOMOGRAPHS: &[&str] = &[
    "\u{0440}aypal",       // Cyrillic er
    "g\u{043e}\u{043e}gle", // Cyrillic o (x2)
    "\u{0430}mazon",       // Cyrillic a
    "mi\u{0441}rosoft",    // Cyrillic es
];

pub const DEFAULT_SUSPICIOUS_TLDS: &[&str] = &[".tk", ".ml", ".ga", ".cf", ".gq", ".xyz", ".top"];

pub const DEFAULT_URL_SHORTENERS: &[&str] = &["bit.ly", "tinyurl", "goo.gl", "ow.ly", "t.co"];

pub const DEFAULT_SEQUENTIAL_TOKENS: &[&str] = &["123", "abc", "000", "111"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fusion_weights_sum_to_one() {
        assert!((STRUCTURAL_WEIGHT + PATTERN_WEIGHT - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_homographs_are_not_ascii() {
        for h in DEFAULT_HOMOGRAPHS {
            assert!(!h.is_ascii(), "{} should contain a lookalike character", h);
        }
    }

    #[test]
    fn test_default_lists_are_lowercase() {
        for list in [
            DEFAULT_PHISHING_KEYWORDS,
            DEFAULT_BRAND_NAMES,
            DEFAULT_SUSPICIOUS_TLDS,
            DEFAULT_URL_SHORTENERS,
            DEFAULT_SEQUENTIAL_TOKENS,
        ] {
            for entry in list {
                assert_eq!(*entry, entry.to_lowercase());
            }
        }
    }
}
