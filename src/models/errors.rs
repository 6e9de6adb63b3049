//! Centralized Error Handling Module
//!
//! Every failure outside the scoring core carries a unique error code so it
//! can be grepped in logs and mapped to an HTTP status.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors
//! - HIST_xxx: History persistence errors
//!
//! The scoring engine itself never fails: an unparseable URL is encoded as
//! data (`FeatureRecord::Invalid`), not as an `AppError`.

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Empty URL after trimming
    ApiEmptyUrl,
    /// Batch larger than the allowed maximum
    ApiBatchTooLarge,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Resource not found
    ApiNotFound,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
    /// Config file could not be read or parsed
    ConfigLoadFailed,

    // ============================================
    // History Errors
    // ============================================
    /// History file could not be read or parsed
    HistoryLoadFailed,
    /// History file could not be written
    HistorySaveFailed,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // API Errors
            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiEmptyUrl => "API_EMPTY_URL",
            Self::ApiBatchTooLarge => "API_BATCH_TOO_LARGE",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiNotFound => "API_NOT_FOUND",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            // Configuration Errors
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::ConfigLoadFailed => "CFG_LOAD_FAILED",

            // History Errors
            Self::HistoryLoadFailed => "HIST_LOAD_FAILED",
            Self::HistorySaveFailed => "HIST_SAVE_FAILED",

            // Generic
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest
            | Self::ApiEmptyUrl
            | Self::ApiBatchTooLarge
            | Self::ConfigInvalidValue => 400,
            Self::ApiNotFound => 404,
            Self::ApiRateLimited => 429,
            _ => 500,
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// Blank URL submitted for scanning
    pub fn empty_url() -> Self {
        Self::new(ErrorCode::ApiEmptyUrl, "Please enter a URL")
    }

    /// Batch exceeds the maximum size
    pub fn batch_too_large(size: usize, max: usize) -> Self {
        Self::new(
            ErrorCode::ApiBatchTooLarge,
            format!("Batch of {} URLs exceeds the maximum of {}", size, max),
        )
    }

    /// Resource not found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiNotFound, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;
