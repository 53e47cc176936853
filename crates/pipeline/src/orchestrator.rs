//! Simulation lifecycle: `Idle -> Running -> Completed | Failed`.
//!
//! [`SimulationOrchestrator`] runs the scenario stage, then the image
//! stage, and keeps the single in-memory result slot. Only one run can be
//! in flight: the `Running` transition is a check-and-set under the state
//! write lock, and the lock is never held across a service call.
//!
//! Lifecycle changes are broadcast as [`SimulationEvent`]s. Call
//! [`SimulationOrchestrator::subscribe`] to receive them.

use std::sync::Arc;

use premortem_core::error::CoreError;
use premortem_core::notice::SIMULATION_FAILURE_NOTICE;
use premortem_core::project::{validate_project_input, ProjectInput};
use premortem_core::prompt::ScenarioRequestBuilder;
use premortem_core::scenario::GeneratedResult;
use premortem_core::types::{new_run_id, RunId, Timestamp};
use premortem_gemini::service::{ImageGenerationService, TextGenerationService};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::config::GenerationSettings;
use crate::events::SimulationEvent;
use crate::image::ImageGenerator;
use crate::scenario::{GenerationFailure, ScenarioGenerator};

/// Broadcast channel capacity for lifecycle events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Current lifecycle state of the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationState {
    /// Nothing submitted, or reset.
    Idle,
    /// A run is in flight; further submissions are rejected.
    Running { run_id: RunId, started_at: Timestamp },
    /// The last run produced a result.
    Completed { run_id: RunId, result: GeneratedResult },
    /// The last run failed at the scenario stage. Submit-ready.
    Failed { run_id: RunId, notice: String },
}

/// Coarse status, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    Idle,
    Running,
    Completed,
    Failed,
}

impl SimulationState {
    pub fn status(&self) -> SimulationStatus {
        match self {
            Self::Idle => SimulationStatus::Idle,
            Self::Running { .. } => SimulationStatus::Running,
            Self::Completed { .. } => SimulationStatus::Completed,
            Self::Failed { .. } => SimulationStatus::Failed,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn run_id(&self) -> Option<RunId> {
        match self {
            Self::Idle => None,
            Self::Running { run_id, .. }
            | Self::Completed { run_id, .. }
            | Self::Failed { run_id, .. } => Some(*run_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// The submitted input was rejected before any run started.
    #[error(transparent)]
    InvalidInput(CoreError),

    /// A run is already in flight.
    #[error("A simulation is already running")]
    SimulationInProgress,

    /// The scenario stage failed. `notice` is the user-facing message.
    #[error("Simulation {run_id} failed: {source}")]
    Failed {
        run_id: RunId,
        notice: String,
        #[source]
        source: GenerationFailure,
    },
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Sequences scenario then image generation and owns the result slot.
pub struct SimulationOrchestrator {
    scenario: ScenarioGenerator,
    image: ImageGenerator,
    state: Arc<RwLock<SimulationState>>,
    event_tx: broadcast::Sender<SimulationEvent>,
}

impl SimulationOrchestrator {
    pub fn new(scenario: ScenarioGenerator, image: ImageGenerator) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            scenario,
            image,
            state: Arc::new(RwLock::new(SimulationState::Idle)),
            event_tx,
        }
    }

    /// Wire both generators to their services using `settings`.
    pub fn from_settings(
        text_service: Arc<dyn TextGenerationService>,
        image_service: Arc<dyn ImageGenerationService>,
        settings: &GenerationSettings,
    ) -> Self {
        let builder = ScenarioRequestBuilder::new(settings.horizon_year, settings.language.clone());
        let scenario = ScenarioGenerator::new(text_service, settings.text_model.clone(), builder);
        let image = ImageGenerator::new(
            image_service,
            settings.image_model.clone(),
            settings.image_config.clone(),
        );
        Self::new(scenario, image)
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SimulationEvent> {
        self.event_tx.subscribe()
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> SimulationState {
        self.state.read().await.clone()
    }

    /// The result of the last completed run, if the slot holds one.
    pub async fn current_result(&self) -> Option<GeneratedResult> {
        match &*self.state.read().await {
            SimulationState::Completed { result, .. } => Some(result.clone()),
            _ => None,
        }
    }

    /// Run one simulation for `input`.
    ///
    /// Invalid input and concurrent submissions are rejected without
    /// touching the state. A scenario-stage failure leaves the orchestrator
    /// in `Failed`; an image-stage failure only drops the image.
    pub async fn run(&self, input: ProjectInput) -> Result<GeneratedResult, OrchestratorError> {
        validate_project_input(&input).map_err(OrchestratorError::InvalidInput)?;

        let run_id = self.begin().await?;
        let mut guard = RunGuard {
            state: Arc::clone(&self.state),
            run_id,
            armed: true,
        };

        tracing::info!(%run_id, project = %input.name, "Simulation started");

        let scenario = match self.scenario.generate(&input).await {
            Ok(scenario) => scenario,
            Err(e) => {
                tracing::error!(%run_id, error = %e, "Simulation failed at scenario stage");
                self.set_state(SimulationState::Failed {
                    run_id,
                    notice: SIMULATION_FAILURE_NOTICE.to_string(),
                })
                .await;
                guard.armed = false;
                self.emit(SimulationEvent::Failed { run_id });
                return Err(OrchestratorError::Failed {
                    run_id,
                    notice: SIMULATION_FAILURE_NOTICE.to_string(),
                    source: e,
                });
            }
        };
        self.emit(SimulationEvent::ScenarioReady { run_id });

        let image_url = self.image.generate(&scenario, &input.name).await;
        if image_url.is_none() {
            self.emit(SimulationEvent::ImageSkipped { run_id });
        }

        let result = GeneratedResult {
            scenario,
            image_url,
        };
        let has_image = result.image_url.is_some();

        self.set_state(SimulationState::Completed {
            run_id,
            result: result.clone(),
        })
        .await;
        guard.armed = false;

        tracing::info!(%run_id, has_image, "Simulation completed");
        self.emit(SimulationEvent::Completed { run_id, has_image });

        Ok(result)
    }

    /// Discard any result and return to `Idle`. Rejected while running.
    pub async fn reset(&self) -> Result<(), OrchestratorError> {
        let mut state = self.state.write().await;
        if state.is_running() {
            return Err(OrchestratorError::SimulationInProgress);
        }
        *state = SimulationState::Idle;
        drop(state);

        tracing::info!("Simulation reset");
        self.emit(SimulationEvent::Reset);
        Ok(())
    }

    // ---- private helpers ----

    /// Check-and-set into `Running`.
    async fn begin(&self) -> Result<RunId, OrchestratorError> {
        let mut state = self.state.write().await;
        if state.is_running() {
            tracing::warn!("Rejected submission while a simulation is running");
            return Err(OrchestratorError::SimulationInProgress);
        }
        let run_id = new_run_id();
        *state = SimulationState::Running {
            run_id,
            started_at: chrono::Utc::now(),
        };
        drop(state);

        self.emit(SimulationEvent::Started { run_id });
        Ok(run_id)
    }

    async fn set_state(&self, next: SimulationState) {
        *self.state.write().await = next;
    }

    fn emit(&self, event: SimulationEvent) {
        let _ = self.event_tx.send(event);
    }
}

/// Moves a run that is dropped mid-flight (its future cancelled) out of
/// `Running`, so the orchestrator cannot stay locked.
///
/// When the state lock is busy at drop time the release is deferred to a
/// task that waits for the write lock.
struct RunGuard {
    state: Arc<RwLock<SimulationState>>,
    run_id: RunId,
    armed: bool,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let run_id = self.run_id;
        if let Ok(mut state) = self.state.try_write() {
            release_cancelled(&mut state, run_id);
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let state = Arc::clone(&self.state);
                handle.spawn(async move {
                    release_cancelled(&mut *state.write().await, run_id);
                });
            }
            Err(_) => {
                tracing::error!(%run_id, "Could not release cancelled simulation");
            }
        }
    }
}

fn release_cancelled(state: &mut SimulationState, run_id: RunId) {
    if state.run_id() == Some(run_id) && state.is_running() {
        tracing::warn!(%run_id, "Simulation cancelled mid-flight");
        *state = SimulationState::Failed {
            run_id,
            notice: SIMULATION_FAILURE_NOTICE.to_string(),
        };
    }
}
