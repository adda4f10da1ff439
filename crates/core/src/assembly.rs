//! Result assembly: joins a user's responses with survey metadata.
//!
//! The repository layer fetches responses, surveys (with questions) and
//! answers as independent sequences. [`assemble_completed`] groups them into
//! one nested view per response. Responses whose survey is missing from the
//! fetched set are reported as [`ReferentialAnomaly`] values instead of
//! failing the whole read.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The response columns needed for assembly.
#[derive(Debug, Clone)]
pub struct ResponseHeader {
    pub response_id: DbId,
    pub survey_id: DbId,
    pub noise_level: f64,
    pub submitted_at: Timestamp,
}

/// A question as it appears under its survey.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutline {
    pub id: DbId,
    pub text: String,
    pub question_type: String,
    pub options: Option<serde_json::Value>,
}

/// A survey with its questions, in insertion order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyOutline {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub demographic: bool,
    pub questions: Vec<QuestionOutline>,
}

/// One stored answer.
#[derive(Debug, Clone)]
pub struct AnswerRecord {
    pub response_id: DbId,
    pub question_id: DbId,
    pub response: String,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// One question of an assembled survey with the user's answer, if any.
///
/// An unanswered question serializes as `"answer": null, "answered": false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledQuestion {
    pub question_id: DbId,
    pub question_text: String,
    pub question_type: String,
    pub answer: Option<String>,
    pub answered: bool,
}

/// A completed response rendered against its survey.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledSurvey {
    pub response_id: DbId,
    pub survey_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub noise_level: f64,
    pub submitted_at: Timestamp,
    pub questions: Vec<AssembledQuestion>,
}

/// A response that references a survey absent at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferentialAnomaly {
    pub response_id: DbId,
    pub survey_id: DbId,
}

/// Assembled surveys plus the responses that had to be skipped.
#[derive(Debug, Default)]
pub struct Assembly {
    pub surveys: Vec<AssembledSurvey>,
    pub anomalies: Vec<ReferentialAnomaly>,
}

/// A survey annotated with whether the user has any response for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyWithCompletion {
    #[serde(flatten)]
    pub survey: SurveyOutline,
    pub completed: bool,
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Build one [`AssembledSurvey`] per response, in the order responses are given.
///
/// Every question of the response's survey appears exactly once; answers to
/// questions that no longer exist on the survey are ignored.
pub fn assemble_completed(
    responses: &[ResponseHeader],
    surveys: &[SurveyOutline],
    answers: &[AnswerRecord],
) -> Assembly {
    let surveys_by_id: HashMap<DbId, &SurveyOutline> =
        surveys.iter().map(|s| (s.id, s)).collect();

    let mut answers_by_response: HashMap<DbId, HashMap<DbId, &str>> = HashMap::new();
    for answer in answers {
        answers_by_response
            .entry(answer.response_id)
            .or_default()
            .insert(answer.question_id, answer.response.as_str());
    }

    let mut assembly = Assembly::default();
    for response in responses {
        let Some(survey) = surveys_by_id.get(&response.survey_id) else {
            assembly.anomalies.push(ReferentialAnomaly {
                response_id: response.response_id,
                survey_id: response.survey_id,
            });
            continue;
        };

        let given = answers_by_response.get(&response.response_id);
        let questions = survey
            .questions
            .iter()
            .map(|q| {
                let answer = given
                    .and_then(|by_question| by_question.get(&q.id))
                    .map(|r| (*r).to_string());
                AssembledQuestion {
                    question_id: q.id,
                    question_text: q.text.clone(),
                    question_type: q.question_type.clone(),
                    answered: answer.is_some(),
                    answer,
                }
            })
            .collect();

        assembly.surveys.push(AssembledSurvey {
            response_id: response.response_id,
            survey_id: survey.id,
            title: survey.title.clone(),
            description: survey.description.clone(),
            noise_level: response.noise_level,
            submitted_at: response.submitted_at,
            questions,
        });
    }
    assembly
}

/// Annotate each survey with whether `responded` contains its id.
pub fn annotate_completion(
    surveys: Vec<SurveyOutline>,
    responded: &HashSet<DbId>,
) -> Vec<SurveyWithCompletion> {
    surveys
        .into_iter()
        .map(|survey| {
            let completed = responded.contains(&survey.id);
            SurveyWithCompletion { survey, completed }
        })
        .collect()
}
