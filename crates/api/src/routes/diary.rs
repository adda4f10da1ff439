//! Route definitions for the `/diary` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::diary;
use crate::state::AppState;

/// Routes mounted at `/diary`. All require auth.
///
/// ```text
/// GET  /             -> list_entries
/// POST /             -> upsert_or_delete_entry
/// GET  /{entry_id}   -> get_entry
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(diary::list_entries).post(diary::upsert_or_delete_entry),
        )
        .route("/{entry_id}", get(diary::get_entry))
}
