//! Route definitions for the `/key` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::key;
use crate::state::AppState;

/// Routes mounted at `/key`.
///
/// ```text
/// GET    /            -> get_key_status
/// POST   /select      -> select_key
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(key::get_key_status))
        .route("/select", post(key::select_key))
}
