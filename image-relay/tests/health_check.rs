//! Probes, static client serving and router-level behaviour.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{test_config, unreachable_api_base, TestApp};
use image_relay::services::GeminiClient;
use image_relay::startup::{build_router, AppState, MAX_PAYLOAD_BYTES};
use std::path::Path;
use std::sync::Arc;
use tower::util::ServiceExt;

fn router(static_dir: &Path) -> axum::Router {
    let config = test_config(unreachable_api_base(), static_dir.to_path_buf());
    let gemini = GeminiClient::new(config.gemini).expect("Failed to build Gemini client");
    build_router(
        AppState {
            gemini: Arc::new(gemini),
        },
        static_dir,
    )
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn_with(unreachable_api_base(), "does-not-exist".into()).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "image-relay");
}

#[tokio::test]
async fn metrics_endpoint_renders_prometheus_text() {
    let app = TestApp::spawn_with(unreachable_api_base(), "does-not-exist".into()).await;

    // Generate at least one sample first.
    app.client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");

    let response = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("http_requests_total"));
}

#[tokio::test]
async fn static_client_is_served_from_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>relay client</h1>").unwrap();

    let response = router(dir.path())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"<h1>relay client</h1>");
}

#[tokio::test]
async fn missing_static_file_is_404() {
    let dir = tempfile::tempdir().unwrap();

    let response = router(dir.path())
        .oneshot(
            Request::builder()
                .uri("/nope.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_payload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let oversized = format!(r#"{{"data":"{}"}}"#, "a".repeat(MAX_PAYLOAD_BYTES));

    let response = router(dir.path())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/generate")
                .header("content-type", "application/json")
                .body(Body::from(oversized))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let dir = tempfile::tempdir().unwrap();

    let response = router(dir.path())
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/generate")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
