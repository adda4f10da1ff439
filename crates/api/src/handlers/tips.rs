//! Handlers for the read-only `/tips` catalogue.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use tinnilog_core::error::CoreError;
use tinnilog_core::types::DbId;
use tinnilog_db::repositories::TipRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tips
pub async fn list_tips(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tips = TipRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tips }))
}

/// GET /api/v1/tips/{id}
pub async fn get_tip(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tip = TipRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tip", id }))?;
    Ok(Json(DataResponse { data: tip }))
}
