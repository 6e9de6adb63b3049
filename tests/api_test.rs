//! Router tests for the PhishGuard HTTP API

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use phishguard::api::{create_router, AppState, RateLimitConfig, RateLimiter};
use phishguard::{DetectorConfig, ScanHistory};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with_limit(requests_per_minute: u32) -> Router {
    let state = Arc::new(AppState::new(DetectorConfig::default(), ScanHistory::new()));
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig::per_minute(
        requests_per_minute,
    )));
    create_router(state, limiter)
}

fn app() -> Router {
    app_with_limit(1_000)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();
    for uri in ["/health", "/v1/health"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
    }
}

#[tokio::test]
async fn test_scan_then_history_and_stats() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json("/v1/scan", json!({ "url": "http://paypal-secure-login.tk/verify?id=123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verdict"], "suspicious");
    assert_eq!(body["data"]["confidence"], 45);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, history) = send(&app, get("/v1/history")).await;
    assert_eq!(history["data"]["count"], 1);
    assert_eq!(history["data"]["entries"][0]["id"], id.as_str());

    let (status, entry) = send(&app, get(&format!("/v1/history/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["data"]["url"], "http://paypal-secure-login.tk/verify?id=123");

    let (_, stats) = send(&app, get("/v1/stats")).await;
    assert_eq!(stats["data"]["total_scans"], 1);
    assert_eq!(stats["data"]["suspicious"], 1);
    assert_eq!(stats["data"]["timeline"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_empty_url_is_bad_request() {
    let (status, body) = send(&app(), post_json("/v1/scan", json!({ "url": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], "Please enter a URL");
}

#[tokio::test]
async fn test_batch_scan_and_clear() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json(
            "/v1/scan/batch",
            json!({ "urls": ["https://www.google.com", "not a url", ""] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_scanned"], 2);
    assert_eq!(body["data"]["skipped"], 1);

    let request = Request::builder()
        .method("DELETE")
        .uri("/v1/history")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cleared"], 2);

    let (_, stats) = send(&app, get("/v1/stats")).await;
    assert_eq!(stats["data"]["total_scans"], 0);
}

#[tokio::test]
async fn test_unknown_scan_id_is_not_found() {
    let uri = format!("/v1/history/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app(), get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "API_NOT_FOUND");
}

#[tokio::test]
async fn test_report_submission() {
    let (status, body) = send(
        &app(),
        post_json(
            "/v1/reports",
            json!({ "url": "http://free-prizes.tk", "report_type": "phishing", "details": "sms" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Thank you"));
}

#[tokio::test]
async fn test_rate_limit_applies_per_client() {
    let app = app_with_limit(1);
    let scan = || {
        Request::builder()
            .method("POST")
            .uri("/v1/scan")
            .header("content-type", "application/json")
            .header("x-api-key", "pk_test")
            .body(Body::from(r#"{"url":"https://example.com"}"#))
            .unwrap()
    };

    let (status, _) = send(&app, scan()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, scan()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "API_RATE_LIMITED");

    // Health checks bypass the limiter
    let (status, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}
