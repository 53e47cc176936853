//! Lifecycle events emitted by the orchestrator.
//!
//! Presentation layers subscribe to drive loading indicators. Events are
//! fire-and-forget; a send with no subscribers is not an error.

use premortem_core::types::RunId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationEvent {
    /// A run entered `Running`.
    Started { run_id: RunId },

    /// The scenario text is available; image generation follows.
    ScenarioReady { run_id: RunId },

    /// Image generation produced nothing; the run continues without one.
    ImageSkipped { run_id: RunId },

    /// The run finished with a result.
    Completed { run_id: RunId, has_image: bool },

    /// The scenario stage failed.
    Failed { run_id: RunId },

    /// The result slot was cleared.
    Reset,
}
