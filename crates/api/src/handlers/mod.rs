pub mod key;
pub mod simulation;
