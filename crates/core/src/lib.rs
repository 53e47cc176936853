//! Domain types and pure request construction for the pre-mortem simulator.
//!
//! Nothing in this crate performs I/O. The Gemini client lives in
//! `premortem-gemini` and the generation flow in `premortem-pipeline`.

pub mod error;
pub mod notice;
pub mod project;
pub mod prompt;
pub mod scenario;
pub mod types;
