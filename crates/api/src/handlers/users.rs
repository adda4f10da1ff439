//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use tinnilog_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users
///
/// List every user's id and username.
pub async fn list_users(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list_summaries(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}
