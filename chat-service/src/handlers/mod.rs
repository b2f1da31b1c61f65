//! HTTP handlers for the chat service.

pub mod chat;

use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "chat-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness probe: ready once the text provider reports it can serve.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.resolver.provider().health_check().await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "error": e.to_string() })),
        ),
    }
}

pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::get_metrics()
}
