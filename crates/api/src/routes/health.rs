use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether an API key is available for generation calls.
    pub api_key_ready: bool,
}

/// GET /health -- returns service health and key-gate readiness.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let api_key_ready = state.credentials.has_selected_api_key().await;

    let status = if api_key_ready { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        api_key_ready,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
