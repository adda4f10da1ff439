//! Handlers for the caller's settings blob.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tinnilog_core::settings::SettingsOutcome;
use tinnilog_db::models::settings::UserSettings;
use tinnilog_db::repositories::SettingsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of a successful save.
#[derive(Debug, Serialize)]
pub struct SaveSettingsResponse {
    pub outcome: SettingsOutcome,
    pub settings: UserSettings,
}

/// GET /api/v1/settings
///
/// 404 when the user has no settings row; registration always creates one.
pub async fn get_settings(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let settings = SettingsRepo::get(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/settings
///
/// Replace the whole settings object. Fields the body omits are dropped.
pub async fn save_settings(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(blob): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let (outcome, settings) = SettingsRepo::save(&state.pool, auth_user.user_id, &blob).await?;

    tracing::info!(user_id = auth_user.user_id, ?outcome, "Settings saved");

    let status = match outcome {
        SettingsOutcome::Created => StatusCode::CREATED,
        SettingsOutcome::Updated => StatusCode::OK,
    };
    Ok((
        status,
        Json(DataResponse {
            data: SaveSettingsResponse { outcome, settings },
        }),
    ))
}
