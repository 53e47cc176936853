//! Handlers for the API-key gate.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct KeyStatus {
    pub has_selected_api_key: bool,
}

/// GET /api/v1/key
pub async fn get_key_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let has_selected_api_key = state.credentials.has_selected_api_key().await;
    Ok(Json(DataResponse {
        data: KeyStatus {
            has_selected_api_key,
        },
    }))
}

/// POST /api/v1/key/select
///
/// Runs the host's key-selection flow, then reports the resulting status.
pub async fn select_key(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.credentials.open_select_key().await?;
    let has_selected_api_key = state.credentials.has_selected_api_key().await;
    tracing::info!(has_selected_api_key, "Key selection completed");
    Ok(Json(DataResponse {
        data: KeyStatus {
            has_selected_api_key,
        },
    }))
}
