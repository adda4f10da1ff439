//! Survey question types and submission validators.
//!
//! Everything here runs before the reconciler opens a transaction, so a
//! failure never leaves a partial write behind.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Question types
// ---------------------------------------------------------------------------

pub const QUESTION_TYPE_MULTIPLE_CHOICE: &str = "multiple-choice";
pub const QUESTION_TYPE_SINGLE_CHOICE: &str = "single-choice";
pub const QUESTION_TYPE_TEXT: &str = "text";

/// The three kinds of question a survey may ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    SingleChoice,
    Text,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => QUESTION_TYPE_MULTIPLE_CHOICE,
            QuestionType::SingleChoice => QUESTION_TYPE_SINGLE_CHOICE,
            QuestionType::Text => QUESTION_TYPE_TEXT,
        }
    }

    /// Parse the stored column value.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            QUESTION_TYPE_MULTIPLE_CHOICE => Ok(QuestionType::MultipleChoice),
            QUESTION_TYPE_SINGLE_CHOICE => Ok(QuestionType::SingleChoice),
            QUESTION_TYPE_TEXT => Ok(QuestionType::Text),
            other => Err(CoreError::Validation(format!(
                "Unknown question type '{other}'. Must be one of: \
                 {QUESTION_TYPE_MULTIPLE_CHOICE}, {QUESTION_TYPE_SINGLE_CHOICE}, \
                 {QUESTION_TYPE_TEXT}"
            ))),
        }
    }

    /// Choice questions are expected to carry an option list.
    pub fn is_choice(self) -> bool {
        !matches!(self, QuestionType::Text)
    }
}

// ---------------------------------------------------------------------------
// Submission validation
// ---------------------------------------------------------------------------

/// One answer inside a survey submission.
///
/// `response` is free text: the caller decides whether a choice is stored as
/// its label or its index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: DbId,
    pub response: String,
}

/// Validate the answer list of a submission.
///
/// Rejects an empty list and a question answered twice in one submission.
pub fn validate_answers(answers: &[SubmittedAnswer]) -> Result<(), CoreError> {
    if answers.is_empty() {
        return Err(CoreError::Validation(
            "At least one answer is required".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(answers.len());
    for answer in answers {
        if !seen.insert(answer.question_id) {
            return Err(CoreError::Validation(format!(
                "Question {} is answered more than once",
                answer.question_id
            )));
        }
    }
    Ok(())
}

/// Validate the measured noise level (dB). Any finite value is accepted;
/// relative scales such as dBFS are negative.
pub fn validate_noise_level(noise_level: f64) -> Result<(), CoreError> {
    if !noise_level.is_finite() {
        return Err(CoreError::Validation(format!(
            "Noise level must be a finite number, got {noise_level}"
        )));
    }
    Ok(())
}

/// Ensure every answered question belongs to the submitted survey.
pub fn ensure_questions_belong(
    survey_id: DbId,
    answers: &[SubmittedAnswer],
    survey_question_ids: &HashSet<DbId>,
) -> Result<(), CoreError> {
    if let Some(stray) = answers
        .iter()
        .find(|a| !survey_question_ids.contains(&a.question_id))
    {
        return Err(CoreError::Validation(format!(
            "Question {} does not belong to survey {survey_id}",
            stray.question_id
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Survey authoring validation
// ---------------------------------------------------------------------------

/// Validate a survey title.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Survey title must not be empty".to_string()));
    }
    Ok(())
}

/// Validate one question definition and return its parsed type.
pub fn validate_question(
    text: &str,
    question_type: &str,
    options: Option<&[String]>,
) -> Result<QuestionType, CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("Question text must not be empty".to_string()));
    }
    let parsed = QuestionType::parse(question_type)?;
    if parsed.is_choice() && options.map_or(true, <[String]>::is_empty) {
        return Err(CoreError::Validation(format!(
            "A {} question needs at least one option",
            parsed.as_str()
        )));
    }
    Ok(parsed)
}
