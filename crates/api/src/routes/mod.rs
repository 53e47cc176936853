pub mod health;
pub mod key;
pub mod simulation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /key                       key-gate status (GET)
/// /key/select                run key selection (POST)
///
/// /simulations               run a simulation (POST)
/// /simulations/current       snapshot (GET), reset (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/key", key::router())
        .nest("/simulations", simulation::router())
}
