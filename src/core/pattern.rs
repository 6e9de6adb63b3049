//! Pattern Scorer ("LSTM" stage)
//!
//! Lexical heuristics over the raw, lower-cased URL string. Every check is
//! additive and independent; the sum is clamped to [0, 1].

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::features::{contains_any, parse_url};
use crate::models::config::DetectorConfig;
use crate::models::types::ScoreFactor;
use crate::utils::constants::pattern_weights as w;

lazy_static! {
    /// Alphabetic runs long enough to look machine generated
    static ref ALPHA_RUN: Regex = Regex::new(&format!("[a-z]{{{},}}", w::MIN_RANDOM_RUN))
        .expect("alpha run pattern is valid");
}

/// Characters a regex `.` would not match
fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Number of maximal runs of at least `min_len` identical characters
fn count_repeat_runs(s: &str, min_len: usize) -> usize {
    let mut runs = 0;
    let mut current: Option<char> = None;
    let mut run_len = 0;

    for c in s.chars() {
        if Some(c) == current {
            run_len += 1;
        } else {
            if run_len >= min_len {
                runs += 1;
            }
            current = if is_line_terminator(c) { None } else { Some(c) };
            run_len = usize::from(current.is_some());
        }
    }
    if run_len >= min_len {
        runs += 1;
    }
    runs
}

fn unique_ratio(run: &str) -> f64 {
    let mut seen: Vec<char> = run.chars().collect();
    let len = seen.len();
    seen.sort_unstable();
    seen.dedup();
    seen.len() as f64 / len as f64
}

fn has_suspicious_tld(sequence: &str, tlds: &[String]) -> bool {
    if tlds.iter().any(|tld| sequence.ends_with(tld.as_str())) {
        return true;
    }
    // Also catch the TLD when a path or query follows the host
    parse_url(sequence)
        .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
        .map(|host| tlds.iter().any(|tld| host.ends_with(tld.as_str())))
        .unwrap_or(false)
}

/// Per-check breakdown of the pattern score, before clamping
pub fn pattern_breakdown(url: &str, config: &DetectorConfig) -> Vec<ScoreFactor> {
    let sequence = url.to_lowercase();

    // Pattern 1: repetitive characters
    let mut repetition = ScoreFactor::new("repetition");
    let runs = count_repeat_runs(&sequence, w::MIN_REPEAT_RUN);
    if runs > w::MAX_REPEAT_RUNS {
        repetition.add(w::REPETITION, format!("{} repeated-character runs", runs));
    }

    // Pattern 2: random-looking strings
    let mut randomness = ScoreFactor::new("random_strings");
    for run in ALPHA_RUN.find_iter(&sequence) {
        let ratio = unique_ratio(run.as_str());
        if ratio > w::RANDOM_UNIQUE_RATIO {
            randomness.add(w::RANDOM_RUN, format!("Random-looking run '{}'", run.as_str()));
        }
    }

    // Pattern 3: homograph attacks
    let mut homograph = ScoreFactor::new("homograph");
    if let Some(h) = config.homographs.iter().find(|h| sequence.contains(h.as_str())) {
        homograph.add(w::HOMOGRAPH, format!("Lookalike spelling '{}'", h));
    }

    // Pattern 4: suspicious TLDs
    let mut tld = ScoreFactor::new("suspicious_tld");
    if has_suspicious_tld(&sequence, &config.suspicious_tlds) {
        tld.add(w::SUSPICIOUS_TLD, "Suspicious top-level domain");
    }

    // Pattern 5: URL shorteners
    let mut shortener = ScoreFactor::new("shortener");
    if contains_any(&sequence, &config.url_shorteners) {
        shortener.add(w::SHORTENER, "Known URL shortener");
    }

    // Pattern 6: obfuscation
    let mut obfuscation = ScoreFactor::new("obfuscation");
    if sequence.contains("%20") || sequence.contains("%2f") {
        obfuscation.add(w::ENCODED_SEPARATOR, "Encoded space or slash");
    }
    let percents = sequence.matches('%').count();
    if percents > w::MAX_PERCENT_SIGNS {
        obfuscation.add(w::HEAVY_ENCODING, format!("{} percent signs", percents));
    }

    // Pattern 7: sequential tokens
    let mut sequential = ScoreFactor::new("sequential");
    for token in &config.sequential_tokens {
        if sequence.contains(token.as_str()) {
            sequential.add(w::SEQUENTIAL_TOKEN, format!("Contains '{}'", token));
        }
    }

    vec![
        repetition,
        randomness,
        homograph,
        tld,
        shortener,
        obfuscation,
        sequential,
    ]
}

/// Pattern score in [0, 1]
pub fn score_pattern(url: &str, config: &DetectorConfig) -> f64 {
    let sum = ScoreFactor::running_total(&pattern_breakdown(url, config));
    let score = sum.min(w::MAX_SCORE);

    debug!("🧠 Pattern score: {:.4} (raw {:.2})", score, sum);
    score
}
