//! Two-stage pre-mortem generation pipeline.
//!
//! [`scenario::ScenarioGenerator`] produces the structured report,
//! [`image::ImageGenerator`] illustrates it (degrading to no image on any
//! failure), and [`orchestrator::SimulationOrchestrator`] sequences the
//! two while owning the run lifecycle.

pub mod config;
pub mod events;
pub mod image;
pub mod orchestrator;
pub mod scenario;
