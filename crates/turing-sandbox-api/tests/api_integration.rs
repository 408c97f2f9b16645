//! Integration tests for the relay's HTTP surface.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use turing_sandbox_api::{create_app, create_relay_state};
use turing_sandbox_sync::SessionCode;

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!(null));

    (status, json)
}

#[tokio::test]
async fn test_health() {
    let router = create_app(create_relay_state());
    let (status, body) = get(&router, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["sessions"], 0);
    assert!(body["timestamp"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_sessions_lists_subscribers() {
    let state = create_relay_state();
    let router = create_app(state.clone());

    let (_, body) = get(&router, "/api/sessions").await;
    assert_eq!(body["data"], json!([]));

    let _rx1 = state.subscribe(&SessionCode::new("ZULU")).await;
    let _rx2 = state.subscribe(&SessionCode::new("ALFA")).await;
    let _rx3 = state.subscribe(&SessionCode::new("ALFA")).await;

    let (status, body) = get(&router, "/api/sessions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([
            {"code": "ALFA", "subscribers": 2},
            {"code": "ZULU", "subscribers": 1}
        ])
    );

    let (_, health) = get(&router, "/api/health").await;
    assert_eq!(health["data"]["sessions"], 2);
}

#[tokio::test]
async fn test_ws_requires_upgrade() {
    let router = create_app(create_relay_state());
    let (status, _) = get(&router, "/api/ws/ROOM").await;
    assert!(status.is_client_error(), "unexpected status {status}");
}

#[tokio::test]
async fn test_unknown_route() {
    let router = create_app(create_relay_state());
    let (status, _) = get(&router, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
