//! API Route Configuration

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::{logging_middleware, rate_limit_middleware, RateLimiter};
use crate::utils::constants::MAX_CONCURRENT_REQUESTS;

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>, limiter: Arc<RateLimiter>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health & Status
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        // Scanning
        .route("/scan", post(handlers::scan_url))
        .route("/scan/batch", post(handlers::batch_scan))
        // History
        .route(
            "/history",
            get(handlers::get_history).delete(handlers::clear_history),
        )
        .route("/history/:id", get(handlers::get_scan))
        // Threat reports
        .route("/reports", post(handlers::submit_report));

    Router::new()
        .nest("/v1", api_v1)
        .route("/health", get(handlers::health_check))
        .with_state(state)
        // Middleware (order matters - bottom runs first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
}
