//! Handlers for surveys, submissions and per-user results.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tinnilog_core::error::CoreError;
use tinnilog_core::types::DbId;
use tinnilog_db::models::survey_response::SubmitSurveyResponse;
use tinnilog_db::repositories::{SurveyRepo, SurveyResponseRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// GET /api/v1/surveys
///
/// Every survey with its questions, flagged `completed` when the caller has
/// any response to it.
pub async fn list_surveys(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let surveys =
        SurveyResponseRepo::surveys_with_completion_flag(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: surveys }))
}

/// GET /api/v1/surveys/{id}
pub async fn get_survey(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let survey = SurveyRepo::find_outline(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Survey",
            id,
        }))?;
    Ok(Json(DataResponse { data: survey }))
}

/// GET /api/v1/surveys/demographic
pub async fn get_demographic_survey(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let survey = SurveyRepo::find_demographic(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("No demographic survey is configured".into()))?;
    Ok(Json(DataResponse { data: survey }))
}

// ---------------------------------------------------------------------------
// Submission and results
// ---------------------------------------------------------------------------

/// POST /api/v1/surveys/{id}/responses
///
/// Replace the caller's response to this survey. A `409 RETRY` means a
/// concurrent submission for the same survey won; resend unchanged.
pub async fn submit_response(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(survey_id): Path<DbId>,
    Json(input): Json<SubmitSurveyResponse>,
) -> AppResult<impl IntoResponse> {
    let response =
        SurveyResponseRepo::submit(&state.pool, auth_user.user_id, survey_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/surveys/completed
///
/// The caller's completed responses, each with every question of its survey
/// and the matching answer or an unanswered marker.
pub async fn completed_surveys(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let surveys = SurveyResponseRepo::completed_surveys_for(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: surveys }))
}
