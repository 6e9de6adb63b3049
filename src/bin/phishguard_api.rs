//! PhishGuard API Server
//!
//! REST API for hybrid URL phishing classification
//!
//! Usage:
//!   cargo run --bin phishguard_api
//!
//! Environment:
//!   PORT / PHISHGUARD_PORT   - Server port (default: 8080)
//!   PHISHGUARD_HOST          - Server host (default: 0.0.0.0)
//!   PHISHGUARD_HISTORY_PATH  - JSON file for scan history (optional)
//!   PHISHGUARD_SCAN_DELAY_MS - Delay before each scan responds (default: 0)
//!   PHISHGUARD_RATE_LIMIT    - Requests per minute per client (default: 100)
//!   PHISHGUARD_MODEL_CONFIG  - JSON file overriding keyword/brand/TLD lists
//!   RUST_LOG                 - Log filter (default: info)

use phishguard::api::{create_router, start_cleanup_task, AppState, RateLimitConfig, RateLimiter};
use phishguard::utils::constants::{APP_VERSION, DETECTION_METHOD};
use phishguard::{DetectorConfig, HistoryStore, ScanHistory, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let server_config = ServerConfig::from_env()?;
    let detector_config = DetectorConfig::from_env()?;

    // Restore history from disk if configured
    let store = server_config.history_path.clone().map(HistoryStore::new);
    let history = match &store {
        Some(store) => store.load().unwrap_or_else(|e| {
            warn!("⚠️ Starting with empty history: {}", e);
            ScanHistory::new()
        }),
        None => ScanHistory::new(),
    };

    let mut state = AppState::new(detector_config, history).with_scan_delay(server_config.scan_delay);
    if let Some(store) = store {
        state = state.with_store(store);
    }
    let state = Arc::new(state);
    let state_for_shutdown = state.clone();

    let limiter = Arc::new(RateLimiter::new(RateLimitConfig::per_minute(
        server_config.rate_limit,
    )));
    start_cleanup_task(limiter.clone());
    info!("🧹 Rate limiter cleanup task started");

    let app = create_router(state, limiter);

    let addr: SocketAddr = server_config.bind_address().parse()?;

    info!("🛡️ PhishGuard API starting on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /v1/scan          - Classify one URL");
    info!("  POST   /v1/scan/batch    - Classify up to 100 URLs");
    info!("  GET    /v1/history       - Recent scans (most recent first)");
    info!("  GET    /v1/history/:id   - One scan from history");
    info!("  DELETE /v1/history       - Clear history and counters");
    info!("  GET    /v1/stats         - Counters and hourly timeline");
    info!("  POST   /v1/reports       - Report a suspicious URL");
    info!("  GET    /v1/health        - Health check");
    info!("Press Ctrl+C or send SIGTERM for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;


    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🛑 Shutdown signal received, cleaning up...");

    if let Ok(history) = state_for_shutdown.history.read() {
        let stats = history.stats();
        info!("   Total scans: {}", stats.total);
        info!("   Phishing: {}", stats.phishing);
        info!("   Suspicious: {}", stats.suspicious);
    }

    match state_for_shutdown.save_history() {
        Ok(()) => {
            if let Some(store) = &state_for_shutdown.store {
                info!("   ✅ History saved to: {}", store.path().display());
            }
        }
        Err(e) => warn!("   ⚠️ Failed to save history: {}", e),
    }

    info!("👋 PhishGuard API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ==============================================================
      P H I S H G U A R D   A P I   v{}
      {} URL phishing detection
    ==============================================================
    "#,
        APP_VERSION, DETECTION_METHOD
    );
}

/// Resolves on Ctrl+C, or on SIGTERM where the platform has it
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("⚠️ Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
