//! Configuration module for PhishGuard
//!
//! Two layers:
//! - `DetectorConfig`: the swappable rule lists read by the engine
//! - `ServerConfig`: runtime settings for the API binary, from env vars
//!
//! Defaults come from utils/constants.rs; nothing is hardcoded here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::{
    DEFAULT_BRAND_NAMES, DEFAULT_HOMOGRAPHS, DEFAULT_PHISHING_KEYWORDS, DEFAULT_PORT,
    DEFAULT_RATE_LIMIT, DEFAULT_SEQUENTIAL_TOKENS, DEFAULT_SUSPICIOUS_TLDS,
    DEFAULT_URL_SHORTENERS,
};

/// Env var pointing at a JSON rule-list file
pub const MODEL_CONFIG_ENV: &str = "PHISHGUARD_MODEL_CONFIG";

fn to_owned_list(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Rule lists used by feature extraction and the pattern scorer.
///
/// All entries are matched against lower-cased input, so they are stored
/// lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub phishing_keywords: Vec<String>,
    pub brand_names: Vec<String>,
    pub homographs: Vec<String>,
    pub suspicious_tlds: Vec<String>,
    pub url_shorteners: Vec<String>,
    pub sequential_tokens: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            phishing_keywords: to_owned_list(DEFAULT_PHISHING_KEYWORDS),
            brand_names: to_owned_list(DEFAULT_BRAND_NAMES),
            homographs: to_owned_list(DEFAULT_HOMOGRAPHS),
            suspicious_tlds: to_owned_list(DEFAULT_SUSPICIOUS_TLDS),
            url_shorteners: to_owned_list(DEFAULT_URL_SHORTENERS),
            sequential_tokens: to_owned_list(DEFAULT_SEQUENTIAL_TOKENS),
        }
    }
}

impl DetectorConfig {
    /// Parse a JSON document; missing lists keep their defaults
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            AppError::with_source(ErrorCode::ConfigLoadFailed, "Invalid model config JSON", e)
        })?;
        config.normalized()
    }

    /// Load rule lists from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorCode::ConfigLoadFailed,
                format!("Cannot read model config {}", path.display()),
                e,
            )
        })?;
        let config = Self::from_json_str(&raw)?;
        info!("📋 Model config loaded from {}", path.display());
        Ok(config)
    }

    /// Load from `PHISHGUARD_MODEL_CONFIG` if set, defaults otherwise
    pub fn from_env() -> AppResult<Self> {
        match std::env::var(MODEL_CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    /// Trim and lower-case every entry, rejecting blanks
    pub fn normalized(self) -> AppResult<Self> {
        fn normalize(name: &str, list: Vec<String>) -> AppResult<Vec<String>> {
            list.into_iter()
                .map(|entry| {
                    let entry = entry.trim().to_lowercase();
                    if entry.is_empty() {
                        Err(AppError::invalid_config(format!(
                            "Empty entry in {}",
                            name
                        )))
                    } else {
                        Ok(entry)
                    }
                })
                .collect()
        }

        Ok(Self {
            phishing_keywords: normalize("phishing_keywords", self.phishing_keywords)?,
            brand_names: normalize("brand_names", self.brand_names)?,
            homographs: normalize("homographs", self.homographs)?,
            suspicious_tlds: normalize("suspicious_tlds", self.suspicious_tlds)?,
            url_shorteners: normalize("url_shorteners", self.url_shorteners)?,
            sequential_tokens: normalize("sequential_tokens", self.sequential_tokens)?,
        })
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JSON file the history is loaded from and saved to
    pub history_path: Option<PathBuf>,
    /// Cosmetic delay before each scan responds
    pub scan_delay: Duration,
    /// Requests per minute per client
    pub rate_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            history_path: None,
            scan_delay: Duration::ZERO,
            rate_limit: DEFAULT_RATE_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Load from environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (env vars in production, maps in tests)
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("PHISHGUARD_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);

        // PORT is set by most hosting platforms; PHISHGUARD_PORT for local dev
        let port = match lookup("PORT").or_else(|| lookup("PHISHGUARD_PORT")) {
            Some(raw) => parse_value("PORT", &raw)?,
            None => defaults.port,
        };

        let history_path = lookup("PHISHGUARD_HISTORY_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let scan_delay = match lookup("PHISHGUARD_SCAN_DELAY_MS") {
            Some(raw) => Duration::from_millis(parse_value("PHISHGUARD_SCAN_DELAY_MS", &raw)?),
            None => defaults.scan_delay,
        };

        let rate_limit = match lookup("PHISHGUARD_RATE_LIMIT") {
            Some(raw) => parse_value("PHISHGUARD_RATE_LIMIT", &raw)?,
            None => defaults.rate_limit,
        };
        if rate_limit == 0 {
            return Err(AppError::invalid_config("PHISHGUARD_RATE_LIMIT must be > 0"));
        }

        Ok(Self {
            host,
            port,
            history_path,
            scan_delay,
            rate_limit,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::invalid_config(format!("Invalid value for {}: {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_lists() {
        let config = DetectorConfig::default();
        assert_eq!(config.phishing_keywords.len(), 8);
        assert!(config.brand_names.contains(&"paypal".to_string()));
        assert_eq!(config.suspicious_tlds.len(), 7);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DetectorConfig::from_json_str(r#"{"brand_names": [" Netflix ", "EBAY"]}"#)
            .unwrap();
        assert_eq!(config.brand_names, vec!["netflix", "ebay"]);
        assert_eq!(config, DetectorConfig {
            brand_names: vec!["netflix".into(), "ebay".into()],
            ..DetectorConfig::default()
        });
    }

    #[test]
    fn test_blank_entry_rejected() {
        let err = DetectorConfig::from_json_str(r#"{"url_shorteners": ["bit.ly", "  "]}"#)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = DetectorConfig::from_json_str("{not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigLoadFailed);
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = DetectorConfig::from_json_file("/nonexistent/phishguard.json").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigLoadFailed);
    }

    #[test]
    fn test_server_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("PHISHGUARD_PORT", "9090"),
            ("PHISHGUARD_HISTORY_PATH", "/tmp/history.json"),
            ("PHISHGUARD_SCAN_DELAY_MS", "1500"),
        ]
        .into_iter()
        .collect();

        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.history_path, Some(PathBuf::from("/tmp/history.json")));
        assert_eq!(config.scan_delay, Duration::from_millis(1500));
        assert_eq!(config.rate_limit, DEFAULT_RATE_LIMIT);
        assert_eq!(config.bind_address(), "0.0.0.0:9090");
    }

    #[test]
    fn test_server_config_rejects_bad_port() {
        let err = ServerConfig::from_lookup(|k| (k == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
    }

    #[test]
    fn test_server_config_rejects_zero_rate_limit() {
        let err = ServerConfig::from_lookup(|k| {
            (k == "PHISHGUARD_RATE_LIMIT").then(|| "0".to_string())
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
    }
}
