//! Route definitions for the `/tips` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tips;
use crate::state::AppState;

/// Routes mounted at `/tips`.
///
/// ```text
/// GET /       -> list_tips
/// GET /{id}   -> get_tip
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tips::list_tips))
        .route("/{id}", get(tips::get_tip))
}
