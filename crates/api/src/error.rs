use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use premortem_core::notice::{API_KEY_REQUIRED_NOTICE, KEY_SELECTION_UNAVAILABLE_NOTICE};
use premortem_gemini::credentials::CredentialError;
use premortem_pipeline::orchestrator::OrchestratorError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent
/// `{ "error": ..., "code": ... }` JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An error from the simulation orchestrator.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    /// The key gate is closed.
    #[error("An API key must be selected before running a simulation")]
    ApiKeyRequired,

    /// The key-selection flow failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Orchestrator errors ---
            AppError::Orchestrator(err) => match err {
                OrchestratorError::InvalidInput(core) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    core.to_string(),
                ),
                OrchestratorError::SimulationInProgress => (
                    StatusCode::CONFLICT,
                    "SIMULATION_IN_PROGRESS",
                    err.to_string(),
                ),
                OrchestratorError::Failed { run_id, notice, source } => {
                    tracing::error!(%run_id, error = %source, "Simulation failed");
                    (StatusCode::BAD_GATEWAY, "SIMULATION_FAILED", notice.clone())
                }
            },

            // --- Key gate ---
            AppError::ApiKeyRequired => (
                StatusCode::FORBIDDEN,
                "API_KEY_REQUIRED",
                API_KEY_REQUIRED_NOTICE.to_string(),
            ),
            AppError::Credential(err) => match err {
                CredentialError::SelectionUnavailable => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "KEY_SELECTION_UNAVAILABLE",
                    KEY_SELECTION_UNAVAILABLE_NOTICE.to_string(),
                ),
                CredentialError::SelectionFailed(msg) => {
                    tracing::warn!(error = %msg, "Key selection failed");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "KEY_SELECTION_FAILED",
                        err.to_string(),
                    )
                }
            },

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
