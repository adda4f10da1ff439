//! Route definitions for the `/surveys` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::surveys;
use crate::state::AppState;

/// Routes mounted at `/surveys`. All require auth.
///
/// ```text
/// GET  /                  -> list_surveys (with completion flag)
/// GET  /demographic       -> get_demographic_survey
/// GET  /completed         -> completed_surveys
/// GET  /{id}              -> get_survey
/// POST /{id}/responses    -> submit_response
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(surveys::list_surveys))
        .route("/demographic", get(surveys::get_demographic_survey))
        .route("/completed", get(surveys::completed_surveys))
        .route("/{id}", get(surveys::get_survey))
        .route("/{id}/responses", post(surveys::submit_response))
}
