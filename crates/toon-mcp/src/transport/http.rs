//! Streamable HTTP transport: one JSON-RPC message per `POST /mcp`, plus `/health`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::protocol::ProtocolHandler;
use crate::types::{error_codes, McpError, McpResult, RequestId};

use super::framing;

/// HTTP transport for networked MCP clients.
pub struct HttpTransport {
    handler: Arc<ProtocolHandler>,
}

impl HttpTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn router(&self) -> Router {
        router(self.handler.clone())
    }

    /// Bind `addr` (host:port) and serve until the process stops.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Routes for a handler. Exposed separately so tests can drive it without a socket.
pub fn router(handler: Arc<ProtocolHandler>) -> Router {
    Router::new()
        .route(
            "/mcp",
            post(handle_post)
                .get(method_not_allowed)
                .delete(method_not_allowed),
        )
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(handler)
}

/// Requests get `200` with the reply; notifications get `202` with no body.
async fn handle_post(State(handler): State<Arc<ProtocolHandler>>, body: String) -> Response {
    let msg = match framing::parse_message(&body) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Rejected HTTP message: {e}");
            return (
                StatusCode::BAD_REQUEST,
                AxumJson(e.to_json_rpc_value(RequestId::Null)),
            )
                .into_response();
        }
    };

    match handler.handle_message(msg).await {
        Some(reply) => (StatusCode::OK, AxumJson(reply)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// No server-initiated stream and no sessions to close.
async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        AxumJson(json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": {
                "code": error_codes::INVALID_REQUEST,
                "message": "Method not allowed: use POST /mcp"
            }
        })),
    )
        .into_response()
}

async fn handle_health(State(handler): State<Arc<ProtocolHandler>>) -> AxumJson<serde_json::Value> {
    AxumJson(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tools": handler.registry().len(),
    }))
}
