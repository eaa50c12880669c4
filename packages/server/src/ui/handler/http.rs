//! HTTP endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::ui::{gateway::AttachStatus, state::AppState};

/// Socket initialization endpoint.
///
/// Attaches the relay on the first call; every call answers the same text.
pub async fn init_socket(State(state): State<Arc<AppState>>) -> &'static str {
    match state.gateway.attach() {
        Ok(AttachStatus::Attached) => tracing::info!("Socket initialized"),
        Ok(AttachStatus::AlreadyAttached) => tracing::debug!("Socket already initialized"),
        Err(e) => tracing::warn!("Socket initialization deferred: {}", e),
    }
    "Socket initialized"
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
