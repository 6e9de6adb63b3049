//! API Request Handlers

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use super::types::*;
use crate::core::classifier::classify;
use crate::models::config::DetectorConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{ScanResult, Verdict};
use crate::utils::constants::{APP_NAME, DETECTION_METHOD, MAX_BATCH_SIZE};
use crate::utils::history::{HistoryStore, ScanHistory};

type Rejection = (StatusCode, Json<ApiResponse<()>>);
type HandlerResult<T> = Result<Json<ApiResponse<T>>, Rejection>;

/// Shared application state
pub struct AppState {
    pub config: Arc<DetectorConfig>,
    pub history: RwLock<ScanHistory>,
    pub reports: DashMap<Uuid, ThreatReport>,
    pub store: Option<HistoryStore>,
    /// Artificial latency before each single scan
    pub scan_delay: Duration,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: DetectorConfig, history: ScanHistory) -> Self {
        Self {
            config: Arc::new(config),
            history: RwLock::new(history),
            reports: DashMap::new(),
            store: None,
            scan_delay: Duration::ZERO,
            start_time: Instant::now(),
        }
    }

    pub fn with_store(mut self, store: HistoryStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_scan_delay(mut self, delay: Duration) -> Self {
        self.scan_delay = delay;
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Record results in the shared history
    fn record(&self, results: &[ScanResult]) -> AppResult<()> {
        let mut history = self
            .history
            .write()
            .map_err(|_| AppError::internal("History lock poisoned"))?;
        for result in results {
            history.record(result.clone());
        }
        Ok(())
    }

    /// Persist the history if a store is configured
    pub fn save_history(&self) -> AppResult<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let history = self
            .history
            .read()
            .map_err(|_| AppError::internal("History lock poisoned"))?;
        store.save(&history)
    }

    /// Save after a history mutation. Failures are logged, the request still succeeds.
    fn persist(&self) {
        if let Err(e) = self.save_history() {
            warn!("⚠️ Failed to save history: {}", e);
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn reject(err: AppError, start: Instant) -> Rejection {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warn!("❌ {}", err);
    (
        status,
        Json(ApiResponse::error(ApiError::from(&err), elapsed_ms(start))),
    )
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        service: APP_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        detection_method: DETECTION_METHOD.to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Scanning
// ============================================

pub async fn scan_url(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScanRequest>,
) -> HandlerResult<ScanResult> {
    let start = Instant::now();

    let url = req.url.trim();
    if url.is_empty() {
        return Err(reject(AppError::empty_url(), start));
    }

    if !state.scan_delay.is_zero() {
        tokio::time::sleep(state.scan_delay).await;
    }

    let result = classify(url, &state.config);
    info!("🔍 {}", result.summary());

    state
        .record(std::slice::from_ref(&result))
        .map_err(|e| reject(e, start))?;
    state.persist();

    Ok(Json(ApiResponse::success(result, elapsed_ms(start))))
}

pub async fn batch_scan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchScanRequest>,
) -> HandlerResult<BatchScanData> {
    let start = Instant::now();

    if req.urls.is_empty() {
        return Err(reject(AppError::bad_request("No URLs provided"), start));
    }
    if req.urls.len() > MAX_BATCH_SIZE {
        return Err(reject(
            AppError::batch_too_large(req.urls.len(), MAX_BATCH_SIZE),
            start,
        ));
    }

    let total_requested = req.urls.len();
    let results: Vec<ScanResult> = req
        .urls
        .iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .map(|url| classify(url, &state.config))
        .collect();

    state.record(&results).map_err(|e| reject(e, start))?;
    state.persist();

    let count = |verdict: Verdict| results.iter().filter(|r| r.verdict == verdict).count();
    let data = BatchScanData {
        total_requested,
        total_scanned: results.len(),
        total_safe: count(Verdict::Safe),
        total_suspicious: count(Verdict::Suspicious),
        total_phishing: count(Verdict::Phishing),
        skipped: total_requested - results.len(),
        processing_time_ms: elapsed_ms(start),
        results,
    };

    info!(
        "📦 Batch scan: {} URLs, {} phishing, {} suspicious",
        data.total_scanned, data.total_phishing, data.total_suspicious
    );

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// History & Stats
// ============================================

pub async fn get_history(State(state): State<Arc<AppState>>) -> HandlerResult<HistoryData> {
    let start = Instant::now();

    let history = state
        .history
        .read()
        .map_err(|_| reject(AppError::internal("History lock poisoned"), start))?;

    let data = HistoryData {
        count: history.len(),
        capacity: history.capacity(),
        entries: history.to_vec(),
    };

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

pub async fn get_scan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> HandlerResult<ScanResult> {
    let start = Instant::now();

    let history = state
        .history
        .read()
        .map_err(|_| reject(AppError::internal("History lock poisoned"), start))?;
    let result = history
        .get(id)
        .cloned()
        .ok_or_else(|| reject(AppError::not_found(format!("Scan {} not in history", id)), start))?;

    Ok(Json(ApiResponse::success(result, elapsed_ms(start))))
}

pub async fn clear_history(State(state): State<Arc<AppState>>) -> HandlerResult<ClearedData> {
    let start = Instant::now();

    let cleared = {
        let mut history = state
            .history
            .write()
            .map_err(|_| reject(AppError::internal("History lock poisoned"), start))?;
        let cleared = history.len();
        history.clear();
        cleared
    };
    state.persist();

    info!("🗑️ History cleared ({} entries)", cleared);
    Ok(Json(ApiResponse::success(
        ClearedData { cleared },
        elapsed_ms(start),
    )))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> HandlerResult<StatsData> {
    let start = Instant::now();

    let (stats, timeline) = {
        let history = state
            .history
            .read()
            .map_err(|_| reject(AppError::internal("History lock poisoned"), start))?;
        (history.stats(), history.timeline(Utc::now()))
    };

    let data = StatsData::new(
        stats,
        timeline,
        state.reports.len(),
        state.uptime_seconds(),
    );

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// Threat Reports
// ============================================

pub async fn submit_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReportRequest>,
) -> HandlerResult<ReportAck> {
    let start = Instant::now();

    let url = req.url.trim();
    if url.is_empty() {
        return Err(reject(AppError::empty_url(), start));
    }

    let report = ThreatReport {
        id: Uuid::new_v4(),
        url: url.to_string(),
        report_type: req.report_type,
        details: req.details,
        received_at: Utc::now(),
    };
    let id = report.id;

    info!("🚩 Threat report {} ({}): {}", id, report.report_type, report.url);
    state.reports.insert(id, report);

    let ack = ReportAck {
        id,
        message: "Thank you for reporting! Our team will review this URL.".to_string(),
    };

    Ok(Json(ApiResponse::success(ack, elapsed_ms(start))))
}
