pub mod auth;
pub mod diary;
pub mod health;
pub mod settings;
pub mod surveys;
pub mod tips;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                   register (public)
/// /auth/login                      login (public)
/// /auth/authenticate               token check
/// /auth/me                         own profile
/// /auth/password                   change password (PUT)
///
/// /users                           id + username of every user
///
/// /tips                            list (public)
/// /tips/{id}                       get (public)
///
/// /surveys                         list with completion flag
/// /surveys/demographic             the demographic survey
/// /surveys/completed               completed responses, assembled
/// /surveys/{id}                    get with questions
/// /surveys/{id}/responses          submit (POST)
///
/// /diary                           list, upsert-or-delete (GET, POST)
/// /diary/{entry_id}                get
///
/// /settings                        get, save (GET, PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/tips", tips::router())
        .nest("/surveys", surveys::router())
        .nest("/diary", diary::router())
        .nest("/settings", settings::router())
}
