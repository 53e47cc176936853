use std::sync::Arc;

use premortem_gemini::credentials::CredentialGate;
use premortem_pipeline::orchestrator::SimulationOrchestrator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything lives behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// The single simulation slot.
    pub orchestrator: Arc<SimulationOrchestrator>,
    /// Key gate consulted before a simulation may start.
    pub credentials: Arc<dyn CredentialGate>,
}
