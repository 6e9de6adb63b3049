//! Type definitions for PhishGuard
//! Feature records, verdicts and scan results shared by the engine and its callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::utils::constants::{DETECTION_METHOD, DISPLAY_URL_CHARS};

/// Final classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Safe,
    Suspicious,
    Phishing,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "safe",
            Verdict::Suspicious => "suspicious",
            Verdict::Phishing => "phishing",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Verdict::Safe => "✅",
            Verdict::Suspicious => "⚠️",
            Verdict::Phishing => "🚨",
        }
    }

    /// Headline shown next to the result
    pub fn headline(&self) -> &'static str {
        match self {
            Verdict::Safe => "URL appears SAFE",
            Verdict::Suspicious => "URL is SUSPICIOUS",
            Verdict::Phishing => "PHISHING DETECTED",
        }
    }
}

/// Serde helpers for binary indicators stored as 0/1
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(deserializer)? != 0)
    }
}

/// Features of a URL that parsed successfully
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlFeatures {
    // Length features
    pub url_length: usize,
    pub domain_length: usize,
    pub path_length: usize,

    // Character features (raw string)
    pub num_dots: usize,
    pub num_hyphens: usize,
    pub num_underscores: usize,
    pub num_digits: usize,
    pub num_special_chars: usize,

    // Security features (parsed URL)
    #[serde(rename = "hasHTTPS", with = "flag")]
    pub has_https: bool,
    #[serde(rename = "hasIP", with = "flag")]
    pub has_ip: bool,
    #[serde(with = "flag")]
    pub has_port: bool,
    #[serde(with = "flag")]
    pub has_subdomain: bool,

    // Suspicious syntax
    #[serde(with = "flag")]
    pub has_at_symbol: bool,
    #[serde(with = "flag")]
    pub has_double_slash: bool,

    // Keyword lists
    #[serde(with = "flag")]
    pub has_phishing_keyword: bool,
    #[serde(with = "flag")]
    pub has_brand_name: bool,
}

impl UrlFeatures {
    /// Ratio of special characters to URL length, 0 for an empty URL
    pub fn special_char_ratio(&self) -> f64 {
        if self.url_length == 0 {
            return 0.0;
        }
        self.num_special_chars as f64 / self.url_length as f64
    }
}

/// Marker for a URL that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidUrl {
    #[serde(rename = "invalidURL")]
    pub invalid_url: u8,
}

/// Feature record produced once per scan.
///
/// Either every feature is present or only the `invalidURL` flag is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureRecord {
    Parsed(UrlFeatures),
    Invalid(InvalidUrl),
}

impl FeatureRecord {
    pub fn invalid() -> Self {
        FeatureRecord::Invalid(InvalidUrl { invalid_url: 1 })
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, FeatureRecord::Invalid(_))
    }

    pub fn parsed(&self) -> Option<&UrlFeatures> {
        match self {
            FeatureRecord::Parsed(features) => Some(features),
            FeatureRecord::Invalid(_) => None,
        }
    }

    /// Feature name -> numeric value, using the serialized names
    pub fn to_map(&self) -> BTreeMap<&'static str, u64> {
        let mut map = BTreeMap::new();
        match self {
            FeatureRecord::Invalid(_) => {
                map.insert("invalidURL", 1);
            }
            FeatureRecord::Parsed(f) => {
                map.insert("urlLength", f.url_length as u64);
                map.insert("domainLength", f.domain_length as u64);
                map.insert("pathLength", f.path_length as u64);
                map.insert("numDots", f.num_dots as u64);
                map.insert("numHyphens", f.num_hyphens as u64);
                map.insert("numUnderscores", f.num_underscores as u64);
                map.insert("numDigits", f.num_digits as u64);
                map.insert("numSpecialChars", f.num_special_chars as u64);
                map.insert("hasHTTPS", u64::from(f.has_https));
                map.insert("hasIP", u64::from(f.has_ip));
                map.insert("hasPort", u64::from(f.has_port));
                map.insert("hasSubdomain", u64::from(f.has_subdomain));
                map.insert("hasAtSymbol", u64::from(f.has_at_symbol));
                map.insert("hasDoubleSlash", u64::from(f.has_double_slash));
                map.insert("hasPhishingKeyword", u64::from(f.has_phishing_keyword));
                map.insert("hasBrandName", u64::from(f.has_brand_name));
            }
        }
        map
    }

    /// Look up a single feature by its serialized name
    pub fn get(&self, name: &str) -> Option<u64> {
        self.to_map().get(name).copied()
    }
}

/// Contribution of one scoring rule group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreFactor {
    pub name: &'static str,
    pub contribution: f64,
    /// Rules that fired, empty when the group added nothing
    pub reasons: Vec<String>,
    /// Increments in the order the rules fired
    #[serde(skip)]
    pub increments: Vec<f64>,
}

impl ScoreFactor {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            contribution: 0.0,
            reasons: Vec::new(),
            increments: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, increment: f64, reason: impl Into<String>) {
        self.contribution += increment;
        self.increments.push(increment);
        self.reasons.push(reason.into());
    }

    /// Sum every increment across `factors` into one accumulator, in rule
    /// order. Adding per-group subtotals instead rounds differently and can
    /// move a score across a verdict threshold.
    pub fn running_total(factors: &[ScoreFactor]) -> f64 {
        factors
            .iter()
            .flat_map(|factor| factor.increments.iter())
            .fold(0.0, |score, increment| score + increment)
    }
}

/// Intermediate scores kept for transparency
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelScores {
    /// Structural ("Random Forest") score, uncapped
    pub structural: f64,
    /// Pattern ("LSTM") score in [0, 1]
    pub pattern: f64,
    /// Weighted fusion of both
    pub fused: f64,
}

/// Output of one classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub url: String,
    pub verdict: Verdict,
    /// Certainty in the verdict (0-95)
    pub confidence: u8,
    /// Fused score x 100, may exceed 100
    pub risk_score: u32,
    pub timestamp: DateTime<Utc>,
    pub features: FeatureRecord,
    #[serde(default)]
    pub scores: ModelScores,
}

impl ScanResult {
    /// URL shortened for table display
    pub fn display_url(&self) -> String {
        if self.url.chars().count() > DISPLAY_URL_CHARS {
            let head: String = self.url.chars().take(DISPLAY_URL_CHARS).collect();
            format!("{}...", head)
        } else {
            self.url.clone()
        }
    }

    /// Label/value rows for the analysis details panel
    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        let (length, https) = match &self.features {
            FeatureRecord::Parsed(f) => (
                format!("{} chars", f.url_length),
                if f.has_https { "✓ Yes" } else { "✗ No" }.to_string(),
            ),
            FeatureRecord::Invalid(_) => ("invalid URL".to_string(), "✗ No".to_string()),
        };

        vec![
            ("URL Length", length),
            ("HTTPS Enabled", https),
            ("Risk Score", format!("{}/100", self.risk_score)),
            ("Detection Method", DETECTION_METHOD.to_string()),
        ]
    }

    /// One-line summary for logs and the CLI
    pub fn summary(&self) -> String {
        format!(
            "{} {} | Confidence: {}% | Risk: {}/100 | {}",
            self.verdict.emoji(),
            self.verdict.headline(),
            self.confidence,
            self.risk_score,
            self.display_url()
        )
    }
}
