//! API Request/Response Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::errors::{AppError, ErrorCode};
use crate::models::types::ScanResult;
use crate::utils::history::{ScanStats, TimelinePoint};

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            code: ErrorCode::ApiRateLimited.as_str().to_string(),
            message: format!("Rate limit exceeded. Retry after {} seconds", retry_after),
            details: Some(format!("retry_after: {}", retry_after)),
        }
    }
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: None,
        }
    }
}

// ============================================
// Scanning
// ============================================

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchScanRequest {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchScanData {
    pub total_requested: usize,
    pub total_scanned: usize,
    pub total_safe: usize,
    pub total_suspicious: usize,
    pub total_phishing: usize,
    /// One entry per non-blank URL, in request order
    pub results: Vec<ScanResult>,
    /// Blank URLs that were not scanned
    pub skipped: usize,
    pub processing_time_ms: f64,
}

// ============================================
// History / Stats
// ============================================

#[derive(Debug, Serialize)]
pub struct HistoryData {
    pub count: usize,
    pub capacity: usize,
    pub entries: Vec<ScanResult>,
}

#[derive(Debug, Serialize)]
pub struct ClearedData {
    pub cleared: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub total_scans: u64,
    pub safe: u64,
    pub suspicious: u64,
    pub phishing: u64,
    pub timeline: Vec<TimelinePoint>,
    pub reports_received: usize,
    pub uptime_seconds: u64,
    pub api_version: String,
}

impl StatsData {
    pub fn new(
        stats: ScanStats,
        timeline: Vec<TimelinePoint>,
        reports_received: usize,
        uptime_seconds: u64,
    ) -> Self {
        Self {
            total_scans: stats.total,
            safe: stats.safe,
            suspicious: stats.suspicious,
            phishing: stats.phishing,
            timeline,
            reports_received,
            uptime_seconds,
            api_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// ============================================
// Threat Reports
// ============================================

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_report_type")]
    pub report_type: String,
    #[serde(default)]
    pub details: String,
}

fn default_report_type() -> String {
    "phishing".to_string()
}

/// A user-submitted threat report, kept in memory only
#[derive(Debug, Clone, Serialize)]
pub struct ThreatReport {
    pub id: Uuid,
    pub url: String,
    pub report_type: String,
    pub details: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReportAck {
    pub id: Uuid,
    pub message: String,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub service: String,
    pub version: String,
    pub detection_method: String,
    pub uptime_seconds: u64,
}
