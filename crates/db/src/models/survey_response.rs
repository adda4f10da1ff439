//! Survey response and answer models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tinnilog_core::assembly::{AnswerRecord, ResponseHeader};
use tinnilog_core::survey::SubmittedAnswer;
use tinnilog_core::types::{DbId, Timestamp};

/// A row from the `survey_responses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub survey_id: DbId,
    pub noise_level: f64,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&SurveyResponse> for ResponseHeader {
    fn from(r: &SurveyResponse) -> Self {
        Self {
            response_id: r.id,
            survey_id: r.survey_id,
            noise_level: r.noise_level,
            submitted_at: r.created_at,
        }
    }
}

/// A row from the `answers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: DbId,
    pub survey_response_id: DbId,
    pub question_id: DbId,
    pub response: String,
    pub created_at: Timestamp,
}

impl From<Answer> for AnswerRecord {
    fn from(a: Answer) -> Self {
        Self {
            response_id: a.survey_response_id,
            question_id: a.question_id,
            response: a.response,
        }
    }
}

/// DTO for a survey submission. Replaces any prior response to the same survey.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSurveyResponse {
    pub noise_level: f64,
    #[serde(default)]
    pub completed: bool,
    pub answers: Vec<SubmittedAnswer>,
}
