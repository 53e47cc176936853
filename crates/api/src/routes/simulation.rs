//! Route definitions for the `/simulations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::simulation;
use crate::state::AppState;

/// Routes mounted at `/simulations`.
///
/// ```text
/// POST   /            -> run_simulation
/// GET    /current     -> get_current
/// DELETE /current     -> reset_current
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(simulation::run_simulation))
        .route(
            "/current",
            get(simulation::get_current).delete(simulation::reset_current),
        )
}
