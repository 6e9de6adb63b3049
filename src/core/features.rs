//! Feature Extraction Module
//!
//! Turns a raw URL string into a `FeatureRecord`.
//!
//! Character counts are taken from the string exactly as the caller passed it.
//! Scheme, hostname, port and path come from the parsed URL, which is more
//! accurate than slicing the raw text (IDNA, default ports, dot segments).

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use tracing::debug;
use url::Url;

use crate::models::config::DetectorConfig;
use crate::models::types::{FeatureRecord, UrlFeatures};
use crate::utils::constants::{DEFAULT_SCHEME, SCHEME_PREFIX, SUBDOMAIN_LABEL_THRESHOLD};

lazy_static! {
    /// Dotted quad anywhere in the hostname
    static ref IPV4_PATTERN: Regex =
        Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+").expect("IPv4 pattern is valid");
}

/// Parse a URL, prefixing `https://` when no scheme is present.
///
/// Returns `None` when the string is not a valid URL even after prefixing.
pub fn parse_url(url: &str) -> Option<Url> {
    let candidate: Cow<'_, str> = if url.starts_with(SCHEME_PREFIX) {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("{}{}", DEFAULT_SCHEME, url))
    };
    Url::parse(&candidate).ok()
}

/// Extract the feature record for a URL. Never fails.
pub fn extract_features(url: &str, config: &DetectorConfig) -> FeatureRecord {
    let parsed = match parse_url(url) {
        Some(parsed) => parsed,
        None => {
            debug!("🔗 Unparseable URL, flagging invalidURL: {:?}", url);
            return FeatureRecord::invalid();
        }
    };

    let hostname = parsed.host_str().unwrap_or("");
    let lower_url = url.to_lowercase();
    let lower_host = hostname.to_lowercase();

    let features = UrlFeatures {
        url_length: url.chars().count(),
        domain_length: hostname.chars().count(),
        path_length: parsed.path().chars().count(),

        num_dots: count_chars(url, |c| c == '.'),
        num_hyphens: count_chars(url, |c| c == '-'),
        num_underscores: count_chars(url, |c| c == '_'),
        num_digits: count_chars(url, |c| c.is_ascii_digit()),
        num_special_chars: count_chars(url, |c| {
            !(c.is_ascii_alphanumeric() || c == '.' || c == '-')
        }),

        has_https: parsed.scheme() == "https",
        has_ip: IPV4_PATTERN.is_match(hostname),
        has_port: parsed.port().is_some(),
        has_subdomain: hostname.split('.').count() > SUBDOMAIN_LABEL_THRESHOLD,

        has_at_symbol: url.contains('@'),
        has_double_slash: url.matches("//").count() > 1,

        has_phishing_keyword: contains_any(&lower_url, &config.phishing_keywords),
        has_brand_name: contains_any(&lower_host, &config.brand_names),
    };

    debug!(
        "🔗 Features for {}: len={}, host={}, https={}, ip={}",
        url, features.url_length, hostname, features.has_https, features.has_ip
    );

    FeatureRecord::Parsed(features)
}

fn count_chars(s: &str, predicate: impl Fn(char) -> bool) -> usize {
    s.chars().filter(|&c| predicate(c)).count()
}

/// True if `haystack` contains any entry of `needles`
pub(crate) fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}
