//! Survey and question models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tinnilog_core::assembly::{QuestionOutline, SurveyOutline};
use tinnilog_core::types::{DbId, Timestamp};

/// A row from the `surveys` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Survey {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub demographic: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub survey_id: DbId,
    pub text: String,
    /// One of `multiple-choice`, `single-choice`, `text`.
    pub question_type: String,
    /// Ordered option labels for choice questions.
    pub options: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Question> for QuestionOutline {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            question_type: q.question_type,
            options: q.options,
        }
    }
}

impl Survey {
    /// Attach this survey's questions, keeping the order given.
    pub fn into_outline(self, questions: Vec<Question>) -> SurveyOutline {
        SurveyOutline {
            id: self.id,
            title: self.title,
            description: self.description,
            demographic: self.demographic,
            questions: questions.into_iter().map(QuestionOutline::from).collect(),
        }
    }
}

/// DTO for one question of a new survey.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestion {
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub options: Option<Vec<String>>,
}

/// DTO for creating a survey together with its questions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurvey {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub demographic: bool,
    pub questions: Vec<CreateQuestion>,
}
