//! Integration tests for the health endpoints and general HTTP behaviour.

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{body_bytes, body_json, build_test_app, get};

#[tokio::test]
async fn health_returns_ok() {
    let app = build_test_app(false).await;
    let response = app.send(get("/api/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn ready_checks_database_and_upload_dir() {
    let app = build_test_app(false).await;
    let response = app.send(get("/api/ready")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"]["sqlite"]["ok"], true);
    assert_eq!(json["checks"]["uploads"]["ok"], true);
    // The probe file is cleaned up.
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn index_lists_endpoints() {
    let app = build_test_app(false).await;
    let response = app.send(get("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("/api/projects"));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(false).await;
    let response = app.send(get("/this-route-does-not-exist")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_allows_admin_token_header() {
    let app = build_test_app(false).await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/projects")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "x-admin-token")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    let allowed = response
        .headers()
        .get("access-control-allow-headers")
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("x-admin-token"));
}
