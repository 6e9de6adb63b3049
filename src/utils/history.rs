//! Scan History Module
//!
//! Caller-owned state kept after each classification:
//! - bounded history, most recent first (capacity 50)
//! - cumulative verdict counters
//! - hourly timeline feed for charts
//! - JSON file persistence
//!
//! The scoring engine never touches any of this.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{ScanResult, Verdict};
use crate::utils::constants::{HISTORY_CAPACITY, TIMELINE_BUCKETS};

/// Cumulative verdict counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub total: u64,
    pub safe: u64,
    pub suspicious: u64,
    pub phishing: u64,
}

impl ScanStats {
    pub fn record(&mut self, verdict: Verdict) {
        self.total += 1;
        match verdict {
            Verdict::Safe => self.safe += 1,
            Verdict::Suspicious => self.suspicious += 1,
            Verdict::Phishing => self.phishing += 1,
        }
    }
}

/// One hourly bucket of the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    /// Hour label, e.g. "14:00"
    pub label: String,
    pub count: usize,
}

/// Bounded, most-recent-first scan history with running counters
#[derive(Debug, Clone)]
pub struct ScanHistory {
    entries: VecDeque<ScanResult>,
    stats: ScanStats,
    capacity: usize,
}

impl Default for ScanHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            stats: ScanStats::default(),
            capacity,
        }
    }

    /// Rebuild from persisted entries (most recent first).
    /// Counters are recomputed from what was kept.
    pub fn from_entries(entries: Vec<ScanResult>) -> Self {
        let mut history = Self::new();
        for entry in entries.into_iter().take(history.capacity) {
            history.stats.record(entry.verdict);
            history.entries.push_back(entry);
        }
        history
    }

    /// Add a result at the front, evicting the oldest entry past capacity.
    /// Counters are cumulative and keep growing after eviction.
    pub fn record(&mut self, result: ScanResult) -> Option<ScanResult> {
        self.stats.record(result.verdict);
        self.entries.push_front(result);

        if self.entries.len() > self.capacity {
            let evicted = self.entries.pop_back();
            if let Some(ref old) = evicted {
                debug!("📜 History full, evicted scan {}", old.id);
            }
            evicted
        } else {
            None
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &ScanResult> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<ScanResult> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&ScanResult> {
        self.entries.front()
    }

    pub fn get(&self, id: Uuid) -> Option<&ScanResult> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Drop all entries and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = ScanStats::default();
    }

    /// Scan counts for the last 7 hours ending at `now`, oldest first.
    ///
    /// An entry lands in a bucket when its hour and day of month match.
    pub fn timeline(&self, now: DateTime<Utc>) -> Vec<TimelinePoint> {
        (0..TIMELINE_BUCKETS)
            .rev()
            .map(|hours_ago| {
                let bucket = now - Duration::hours(hours_ago as i64);
                let count = self
                    .entries
                    .iter()
                    .filter(|entry| {
                        entry.timestamp.hour() == bucket.hour()
                            && entry.timestamp.day() == bucket.day()
                    })
                    .count();
                TimelinePoint {
                    label: format!("{}:00", bucket.hour()),
                    count,
                }
            })
            .collect()
    }
}

/// JSON file persistence for the scan history
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history; a missing file yields an empty history
    pub fn load(&self) -> AppResult<ScanHistory> {
        if !self.path.exists() {
            debug!("📭 No history file at {}", self.path.display());
            return Ok(ScanHistory::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| {
            AppError::with_source(
                ErrorCode::HistoryLoadFailed,
                format!("Cannot read history {}", self.path.display()),
                e,
            )
        })?;
        let entries: Vec<ScanResult> = serde_json::from_str(&raw).map_err(|e| {
            AppError::with_source(
                ErrorCode::HistoryLoadFailed,
                format!("Corrupt history file {}", self.path.display()),
                e,
            )
        })?;

        let history = ScanHistory::from_entries(entries);
        info!(
            "📜 Loaded {} history entries from {}",
            history.len(),
            self.path.display()
        );
        Ok(history)
    }

    /// Write the history as pretty JSON, creating parent directories
    pub fn save(&self, history: &ScanHistory) -> AppResult<()> {
        let save_err = |e: std::io::Error| {
            AppError::with_source(
                ErrorCode::HistorySaveFailed,
                format!("Cannot write history {}", self.path.display()),
                e,
            )
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(save_err)?;
        }

        let json = serde_json::to_string_pretty(&history.to_vec()).map_err(|e| {
            AppError::with_source(ErrorCode::HistorySaveFailed, "Cannot encode history", e)
        })?;
        fs::write(&self.path, json).map_err(save_err)?;

        info!(
            "💾 Saved {} history entries to {}",
            history.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::classify;
    use crate::models::config::DetectorConfig;
    use chrono::TimeZone;

    fn scan(url: &str) -> ScanResult {
        classify(url, &DetectorConfig::default())
    }

    fn scan_at(url: &str, timestamp: DateTime<Utc>) -> ScanResult {
        ScanResult {
            timestamp,
            ..scan(url)
        }
    }

    #[test]
    fn test_most_recent_first() {
        let mut history = ScanHistory::new();
        history.record(scan("https://first.example.com"));
        history.record(scan("https://second.example.com"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().url, "https://second.example.com");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = ScanHistory::new();
        for i in 0..HISTORY_CAPACITY {
            assert!(history.record(scan(&format!("https://site{}.com", i))).is_none());
        }

        let evicted = history.record(scan("https://newest.com")).unwrap();
        assert_eq!(evicted.url, "https://site0.com");
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.latest().unwrap().url, "https://newest.com");
        // Counters are cumulative
        assert_eq!(history.stats().total, HISTORY_CAPACITY as u64 + 1);
    }

    #[test]
    fn test_stats_by_verdict() {
        let mut history = ScanHistory::new();
        history.record(scan("https://www.google.com"));
        history.record(scan("not a url"));

        let stats = history.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.safe, 2);
        assert_eq!(stats.phishing, 0);
    }

    #[test]
    fn test_get_and_clear() {
        let mut history = ScanHistory::new();
        let result = scan("https://example.com");
        let id = result.id;
        history.record(result);

        assert!(history.get(id).is_some());
        assert!(history.get(Uuid::new_v4()).is_none());

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.stats(), ScanStats::default());
    }

    #[test]
    fn test_from_entries_truncates_and_recounts() {
        let entries: Vec<ScanResult> = (0..60)
            .map(|i| scan(&format!("https://site{}.com", i)))
            .collect();
        let history = ScanHistory::from_entries(entries);

        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.stats().total, HISTORY_CAPACITY as u64);
        assert_eq!(history.latest().unwrap().url, "https://site0.com");
    }

    #[test]
    fn test_timeline_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap();
        let mut history = ScanHistory::new();
        history.record(scan_at("https://a.com", now));
        history.record(scan_at("https://b.com", now - Duration::minutes(10)));
        history.record(scan_at("https://c.com", now - Duration::hours(3)));
        // Outside the window
        history.record(scan_at("https://d.com", now - Duration::hours(8)));

        let timeline = history.timeline(now);
        assert_eq!(timeline.len(), TIMELINE_BUCKETS);
        assert_eq!(timeline[0].label, "8:00");
        assert_eq!(timeline[6].label, "14:00");
        assert_eq!(timeline[6].count, 2);
        assert_eq!(timeline[3].count, 1);
        assert_eq!(timeline.iter().map(|p| p.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nested").join("history.json"));

        let mut history = ScanHistory::new();
        history.record(scan("https://www.google.com"));
        history.record(scan("not a url"));
        store.save(&history).unwrap();

        let loaded = store.load().unwrap();
        let ids = |h: &ScanHistory| h.entries().map(|e| (e.id, e.verdict)).collect::<Vec<_>>();
        assert_eq!(ids(&loaded), ids(&history));
        assert_eq!(loaded.stats(), history.stats());
        assert!(loaded.latest().unwrap().features.is_invalid());
    }

    #[test]
    fn test_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("missing.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{ not json").unwrap();

        let err = HistoryStore::new(&path).load().unwrap_err();
        assert_eq!(err.code, ErrorCode::HistoryLoadFailed);
    }

    #[test]
    fn test_store_write_failure_keeps_io_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::create_dir(&path).unwrap();

        let err = HistoryStore::new(&path).save(&ScanHistory::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::HistorySaveFailed);
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }
}
