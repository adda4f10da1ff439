//! Handlers for the caller's diary entries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tinnilog_core::diary::DiaryOutcome;
use tinnilog_core::error::CoreError;
use tinnilog_core::types::DbId;
use tinnilog_db::models::diary_entry::DiaryEntryRequest;
use tinnilog_db::repositories::DiaryEntryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/diary
pub async fn list_entries(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let entries = DiaryEntryRepo::list_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/diary/{entry_id}
pub async fn get_entry(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(entry_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = DiaryEntryRepo::find(&state.pool, auth_user.user_id, entry_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DiaryEntry",
            id: entry_id,
        }))?;
    Ok(Json(DataResponse { data: entry }))
}

/// POST /api/v1/diary
///
/// Create, replace, or (with `"deleted": true`) remove the entry named by
/// `entryId`. Answers 201 on create and 200 otherwise; the body carries the
/// outcome.
pub async fn upsert_or_delete_entry(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<DiaryEntryRequest>,
) -> AppResult<impl IntoResponse> {
    let reconciliation =
        DiaryEntryRepo::upsert_or_delete(&state.pool, auth_user.user_id, &input).await?;

    let status = match reconciliation.outcome {
        DiaryOutcome::Created => StatusCode::CREATED,
        DiaryOutcome::Updated | DiaryOutcome::Deleted => StatusCode::OK,
    };
    Ok((
        status,
        Json(DataResponse {
            data: reconciliation,
        }),
    ))
}
