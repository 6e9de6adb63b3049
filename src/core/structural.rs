//! Structural Scorer ("Random Forest" stage)
//!
//! Seven fixed rule groups over the feature record. Each group adds fixed
//! increments to a running sum and the score is `sum / 7`.
//!
//! Groups are NOT capped: a single group can contribute more than 1.0 and the
//! final score can exceed 1.0. The verdict thresholds were calibrated against
//! this uncapped arithmetic, so it must stay that way.

use tracing::debug;

use crate::models::types::{FeatureRecord, ScoreFactor, UrlFeatures};
use crate::utils::constants::structural_weights as w;
use crate::utils::constants::STRUCTURAL_GROUP_COUNT;

/// Per-group breakdown, always `STRUCTURAL_GROUP_COUNT` entries in rule order.
///
/// For an invalid record the other features read as zero/false, so the
/// length group still adds its short-URL increment and the security group
/// still adds the no-HTTPS increment.
pub fn structural_breakdown(record: &FeatureRecord) -> Vec<ScoreFactor> {
    let zeroed = UrlFeatures::default();
    let (f, invalid) = match record {
        FeatureRecord::Parsed(features) => (features, false),
        FeatureRecord::Invalid(_) => (&zeroed, true),
    };

    // Tree 1: URL length
    let mut length = ScoreFactor::new("url_length");
    if f.url_length > w::LONG_URL_CHARS {
        length.add(w::LONG_URL, format!("URL longer than {} chars", w::LONG_URL_CHARS));
    } else if f.url_length > w::MEDIUM_URL_CHARS {
        length.add(w::MEDIUM_URL, format!("URL longer than {} chars", w::MEDIUM_URL_CHARS));
    } else {
        length.add(w::SHORT_URL, "Short URL baseline");
    }

    // Tree 2: transport security
    let mut security = ScoreFactor::new("security");
    if !f.has_https {
        security.add(w::NO_HTTPS, "No HTTPS");
    }
    if f.has_ip {
        security.add(w::IP_HOST, "Hostname is an IP address");
    }
    if f.has_port {
        security.add(w::EXPLICIT_PORT, "Explicit port");
    }

    // Tree 3: suspicious syntax
    let mut syntax = ScoreFactor::new("suspicious_syntax");
    if f.has_at_symbol {
        syntax.add(w::AT_SYMBOL, "Contains '@'");
    }
    if f.has_double_slash {
        syntax.add(w::DOUBLE_SLASH, "Repeated '//'");
    }
    if f.num_hyphens > w::MAX_HYPHENS {
        syntax.add(w::MANY_HYPHENS, format!("{} hyphens", f.num_hyphens));
    }

    // Tree 4: special character ratio
    let mut characters = ScoreFactor::new("character_ratio");
    let ratio = f.special_char_ratio();
    if ratio > w::HIGH_SPECIAL_RATIO {
        characters.add(w::HIGH_SPECIAL, format!("Special char ratio {:.2}", ratio));
    } else if ratio > w::MEDIUM_SPECIAL_RATIO {
        characters.add(w::MEDIUM_SPECIAL, format!("Special char ratio {:.2}", ratio));
    }

    // Tree 5: domain shape
    let mut domain = ScoreFactor::new("domain");
    if f.domain_length > w::LONG_DOMAIN_CHARS {
        domain.add(w::LONG_DOMAIN, format!("Domain is {} chars", f.domain_length));
    }
    if f.num_dots > w::MAX_DOTS {
        domain.add(w::MANY_DOTS, format!("{} dots", f.num_dots));
    }
    if f.has_subdomain && f.has_brand_name {
        domain.add(w::BRAND_IN_SUBDOMAIN, "Brand name on a subdomain");
    }

    // Tree 6: phishing keywords
    let mut keywords = ScoreFactor::new("phishing_keywords");
    if f.has_phishing_keyword {
        if f.has_https {
            keywords.add(w::KEYWORD_HTTPS, "Phishing keyword over HTTPS");
        } else {
            keywords.add(w::KEYWORD_NO_HTTPS, "Phishing keyword without HTTPS");
        }
    }

    // Tree 7: unparseable URL
    let mut validity = ScoreFactor::new("invalid_url");
    if invalid {
        validity.add(w::INVALID_URL, "URL could not be parsed");
    }

    vec![length, security, syntax, characters, domain, keywords, validity]
}

/// Structural score: unweighted average of the rule groups
pub fn score_structural(record: &FeatureRecord) -> f64 {
    let breakdown = structural_breakdown(record);
    let sum = ScoreFactor::running_total(&breakdown);
    let score = sum / STRUCTURAL_GROUP_COUNT as f64;

    debug!("🌲 Structural score: {:.4} (sum {:.2})", score, sum);
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn features() -> UrlFeatures {
        UrlFeatures {
            url_length: 30,
            domain_length: 11,
            path_length: 1,
            num_dots: 1,
            num_special_chars: 0,
            has_https: true,
            ..UrlFeatures::default()
        }
    }

    fn contribution(record: &FeatureRecord, name: &str) -> f64 {
        structural_breakdown(record)
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.contribution)
            .unwrap()
    }

    #[test]
    fn test_breakdown_has_seven_groups() {
        let record = FeatureRecord::Parsed(features());
        assert_eq!(structural_breakdown(&record).len(), STRUCTURAL_GROUP_COUNT);
    }

    #[test]
    fn test_clean_https_url_baseline() {
        // Only the short-URL baseline fires
        let record = FeatureRecord::Parsed(features());
        assert!((score_structural(&record) - 0.1 / 7.0).abs() < EPS);
    }

    #[test]
    fn test_length_tiers_use_strict_comparison() {
        let at = |len| {
            let record = FeatureRecord::Parsed(UrlFeatures {
                url_length: len,
                ..features()
            });
            contribution(&record, "url_length")
        };
        assert_eq!(at(50), 0.1);
        assert_eq!(at(51), 0.4);
        assert_eq!(at(75), 0.4);
        assert_eq!(at(76), 0.7);
    }

    #[test]
    fn test_security_rules_stack() {
        let record = FeatureRecord::Parsed(UrlFeatures {
            has_https: false,
            has_ip: true,
            has_port: true,
            ..features()
        });
        assert!((contribution(&record, "security") - 1.9).abs() < EPS);
    }

    #[test]
    fn test_syntax_rules_stack() {
        let record = FeatureRecord::Parsed(UrlFeatures {
            has_at_symbol: true,
            has_double_slash: true,
            num_hyphens: 4,
            ..features()
        });
        assert!((contribution(&record, "suspicious_syntax") - 2.2).abs() < EPS);

        let three_hyphens = FeatureRecord::Parsed(UrlFeatures {
            num_hyphens: 3,
            ..features()
        });
        assert_eq!(contribution(&three_hyphens, "suspicious_syntax"), 0.0);
    }

    #[test]
    fn test_character_ratio_tiers() {
        let with_specials = |n| {
            FeatureRecord::Parsed(UrlFeatures {
                url_length: 100,
                num_special_chars: n,
                ..features()
            })
        };
        assert_eq!(contribution(&with_specials(8), "character_ratio"), 0.0);
        assert_eq!(contribution(&with_specials(9), "character_ratio"), 0.5);
        assert_eq!(contribution(&with_specials(15), "character_ratio"), 0.5);
        assert_eq!(contribution(&with_specials(16), "character_ratio"), 0.8);
    }

    #[test]
    fn test_domain_group_is_uncapped() {
        let record = FeatureRecord::Parsed(UrlFeatures {
            domain_length: 41,
            num_dots: 5,
            has_subdomain: true,
            has_brand_name: true,
            ..features()
        });
        // 0.7 + 0.6 + 0.9 = 2.2, no clamp
        assert!((contribution(&record, "domain") - 2.2).abs() < EPS);
    }

    #[test]
    fn test_brand_without_subdomain_does_not_fire() {
        let record = FeatureRecord::Parsed(UrlFeatures {
            has_brand_name: true,
            ..features()
        });
        assert_eq!(contribution(&record, "domain"), 0.0);
    }

    #[test]
    fn test_keyword_depends_on_https() {
        let over_https = FeatureRecord::Parsed(UrlFeatures {
            has_phishing_keyword: true,
            ..features()
        });
        assert_eq!(contribution(&over_https, "phishing_keywords"), 0.4);

        let plain = FeatureRecord::Parsed(UrlFeatures {
            has_phishing_keyword: true,
            has_https: false,
            ..features()
        });
        assert_eq!(contribution(&plain, "phishing_keywords"), 0.9);
    }

    #[test]
    fn test_invalid_record_score() {
        // 0.1 (length baseline) + 0.5 (no HTTPS) + 1.0 (invalid) over 7 groups
        let score = score_structural(&FeatureRecord::invalid());
        assert!((score - 1.6 / 7.0).abs() < EPS);
        assert_eq!(contribution(&FeatureRecord::invalid(), "invalid_url"), 1.0);
    }

    #[test]
    fn test_extreme_record_exceeds_one() {
        let record = FeatureRecord::Parsed(UrlFeatures {
            url_length: 200,
            domain_length: 60,
            num_dots: 8,
            num_hyphens: 10,
            num_special_chars: 100,
            has_https: false,
            has_ip: true,
            has_port: true,
            has_subdomain: true,
            has_at_symbol: true,
            has_double_slash: true,
            has_phishing_keyword: true,
            has_brand_name: true,
            ..features()
        });
        // 0.7 + 1.9 + 2.2 + 0.8 + 2.2 + 0.9 = 8.7
        let score = score_structural(&record);
        assert!(score > 1.0);
        assert!((score - 8.7 / 7.0).abs() < EPS);
    }
}
