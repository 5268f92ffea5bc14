//! Streamable HTTP transport tests, driving the router in-process.
#![cfg(feature = "http-stream")]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use toon_mcp::protocol::ProtocolHandler;
use toon_mcp::tools::ToolRegistry;
use toon_mcp::transport::http::router;

// ─────────────────────── helpers ───────────────────────

fn app() -> axum::Router {
    router(Arc::new(ProtocolHandler::new(Arc::new(
        ToolRegistry::with_toon_tools(),
    ))))
}

async fn post(body: &str) -> (StatusCode, Option<Value>) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    };
    (status, value)
}

async fn status_of(method: &str, uri: &str) -> StatusCode {
    app()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

// ─────────────────────── tests ───────────────────────

#[tokio::test]
async fn test_request_gets_json_reply() {
    let (status, body) = post(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_tool_call_over_http() {
    let request = json!({
        "jsonrpc": "2.0",
        "id": "enc",
        "method": "tools/call",
        "params": { "name": "encode_toon", "arguments": { "json": "[1,2,3]" } }
    });
    let (status, body) = post(&request.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["result"]["content"][0]["text"], "[3]: 1,2,3");
}

#[tokio::test]
async fn test_notification_is_accepted_without_body() {
    let (status, body) = post(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body.is_none());
}

#[tokio::test]
async fn test_garbage_body_is_bad_request() {
    let (status, body) = post("definitely not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = body.unwrap();
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], Value::Null);
}

#[tokio::test]
async fn test_other_methods_on_mcp_are_rejected() {
    assert_eq!(status_of("GET", "/mcp").await, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(status_of("DELETE", "/mcp").await, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["tools"], 2);
}
