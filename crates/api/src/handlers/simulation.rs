//! Handlers for the simulation slot.
//!
//! Routes:
//! - `POST   /simulations`          run a simulation for a submitted project
//! - `GET    /simulations/current`  lifecycle snapshot and result
//! - `DELETE /simulations/current`  reset

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use premortem_core::project::ProjectInput;
use premortem_core::scenario::GeneratedResult;
use premortem_core::types::RunId;
use premortem_pipeline::orchestrator::{SimulationState, SimulationStatus};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Presentation view of the orchestrator state.
#[derive(Debug, Serialize)]
pub struct SimulationView {
    pub status: SimulationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<RunId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GeneratedResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl From<SimulationState> for SimulationView {
    fn from(state: SimulationState) -> Self {
        let status = state.status();
        let run_id = state.run_id();
        let (result, notice) = match state {
            SimulationState::Completed { result, .. } => (Some(result), None),
            SimulationState::Failed { notice, .. } => (None, Some(notice)),
            SimulationState::Idle | SimulationState::Running { .. } => (None, None),
        };
        Self {
            status,
            run_id,
            result,
            notice,
        }
    }
}

/// POST /api/v1/simulations
///
/// Requires a selected API key. The run executes on its own task so a
/// client disconnect cannot abandon it half-way.
pub async fn run_simulation(
    State(state): State<AppState>,
    Json(input): Json<ProjectInput>,
) -> AppResult<impl IntoResponse> {
    if !state.credentials.has_selected_api_key().await {
        return Err(AppError::ApiKeyRequired);
    }

    let orchestrator = Arc::clone(&state.orchestrator);
    let result = tokio::spawn(async move { orchestrator.run(input).await })
        .await
        .map_err(|e| AppError::InternalError(format!("Simulation task failed: {e}")))??;

    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/simulations/current
pub async fn get_current(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let view = SimulationView::from(state.orchestrator.state().await);
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/simulations/current
pub async fn reset_current(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.orchestrator.reset().await?;
    Ok(StatusCode::NO_CONTENT)
}
