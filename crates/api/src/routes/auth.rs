//! Route definitions for the `/auth` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register      -> register
/// POST /login         -> login
/// POST /authenticate  -> authenticate (requires auth)
/// GET  /me            -> me (requires auth)
/// PUT  /password      -> change_password (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/authenticate", post(auth::authenticate))
        .route("/me", get(auth::me))
        .route("/password", put(auth::change_password))
}
