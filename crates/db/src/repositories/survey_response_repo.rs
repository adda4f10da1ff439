//! Repository for the `survey_responses` and `answers` tables.
//!
//! A user has at most one current response per survey. There is no unique
//! constraint backing this; [`SurveyResponseRepo::submit`] keeps it by
//! deleting any prior response and inserting the new one inside a single
//! `SERIALIZABLE` transaction.

use std::collections::HashSet;

use sqlx::PgPool;
use tinnilog_core::assembly::{
    annotate_completion, assemble_completed, AnswerRecord, AssembledSurvey, ResponseHeader,
    SurveyWithCompletion,
};
use tinnilog_core::error::CoreError;
use tinnilog_core::survey::{ensure_questions_belong, validate_answers, validate_noise_level};
use tinnilog_core::types::DbId;

use crate::models::survey_response::{Answer, SubmitSurveyResponse, SurveyResponse};
use crate::repositories::{SurveyRepo, UserRepo};
use crate::StoreError;

/// Column list for `survey_responses` queries.
const RESPONSE_COLUMNS: &str =
    "id, user_id, survey_id, noise_level, completed, created_at, updated_at";

/// Column list for `answers` queries.
const ANSWER_COLUMNS: &str = "id, survey_response_id, question_id, response, created_at";

/// Survey submission and per-user result reads.
pub struct SurveyResponseRepo;

impl SurveyResponseRepo {
    // ── Reconciliation ───────────────────────────────────────────────

    /// Replace the user's response to `survey_id` with a new submission.
    ///
    /// Inside one `SERIALIZABLE` transaction:
    ///
    /// 1. look up prior responses for `(user_id, survey_id)`
    /// 2. delete their answers, then the responses themselves
    /// 3. insert the new response
    /// 4. insert every answer in a single statement
    /// 5. flag the user as demographic-complete if the survey is demographic
    ///
    /// Any failure drops the transaction, which rolls back, so a failed
    /// resubmission leaves the previously committed response intact.
    /// Conflicting concurrent submissions for the same key surface as a
    /// retryable [`StoreError::Persistence`] (see [`StoreError::is_retryable`]).
    pub async fn submit(
        pool: &PgPool,
        user_id: DbId,
        survey_id: DbId,
        input: &SubmitSurveyResponse,
    ) -> Result<SurveyResponse, StoreError> {
        validate_answers(&input.answers)?;
        validate_noise_level(input.noise_level)?;

        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        // Preconditions, checked before anything is written.
        let demographic: Option<bool> =
            sqlx::query_scalar("SELECT demographic FROM surveys WHERE id = $1")
                .bind(survey_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(demographic) = demographic else {
            return Err(CoreError::NotFound {
                entity: "Survey",
                id: survey_id,
            }
            .into());
        };
        if !UserRepo::exists(&mut *tx, user_id).await? {
            return Err(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }
            .into());
        }
        let question_ids: HashSet<DbId> = SurveyRepo::question_ids_with(&mut *tx, survey_id)
            .await?
            .into_iter()
            .collect();
        ensure_questions_belong(survey_id, &input.answers, &question_ids)?;

        // 1. Prior responses for this key.
        let prior: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM survey_responses WHERE user_id = $1 AND survey_id = $2",
        )
        .bind(user_id)
        .bind(survey_id)
        .fetch_all(&mut *tx)
        .await?;

        // 2. Answers first, then their parents.
        if !prior.is_empty() {
            sqlx::query("DELETE FROM answers WHERE survey_response_id = ANY($1)")
                .bind(&prior)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM survey_responses WHERE id = ANY($1)")
                .bind(&prior)
                .execute(&mut *tx)
                .await?;
        }

        // 3. New response.
        let query = format!(
            "INSERT INTO survey_responses (user_id, survey_id, noise_level, completed)
             VALUES ($1, $2, $3, $4)
             RETURNING {RESPONSE_COLUMNS}"
        );
        let response = sqlx::query_as::<_, SurveyResponse>(&query)
            .bind(user_id)
            .bind(survey_id)
            .bind(input.noise_level)
            .bind(input.completed)
            .fetch_one(&mut *tx)
            .await?;

        // 4. All answers at once; no ordering between them is implied.
        let (answer_question_ids, answer_values): (Vec<DbId>, Vec<String>) = input
            .answers
            .iter()
            .map(|a| (a.question_id, a.response.clone()))
            .unzip();
        sqlx::query(
            "INSERT INTO answers (survey_response_id, question_id, response)
             SELECT $1, q, r FROM UNNEST($2::BIGINT[], $3::TEXT[]) AS t(q, r)",
        )
        .bind(response.id)
        .bind(&answer_question_ids)
        .bind(&answer_values)
        .execute(&mut *tx)
        .await?;

        // 5. Demographic completion commits with the submission.
        if demographic {
            UserRepo::mark_demographic(&mut *tx, user_id).await?;
        }

        tx.commit().await?;

        tracing::info!(
            user_id,
            survey_id,
            response_id = response.id,
            replaced = prior.len(),
            answer_count = input.answers.len(),
            demographic,
            "Survey response submitted",
        );
        Ok(response)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// All responses for `(user_id, survey_id)`. Normally zero or one.
    pub async fn list_for_user_survey(
        pool: &PgPool,
        user_id: DbId,
        survey_id: DbId,
    ) -> Result<Vec<SurveyResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM survey_responses
             WHERE user_id = $1 AND survey_id = $2
             ORDER BY id"
        );
        sqlx::query_as::<_, SurveyResponse>(&query)
            .bind(user_id)
            .bind(survey_id)
            .fetch_all(pool)
            .await
    }

    /// All answers of one response.
    pub async fn list_answers(
        pool: &PgPool,
        survey_response_id: DbId,
    ) -> Result<Vec<Answer>, sqlx::Error> {
        let query = format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE survey_response_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Answer>(&query)
            .bind(survey_response_id)
            .fetch_all(pool)
            .await
    }

    /// The user's completed responses, each rendered against its survey's
    /// full question list.
    ///
    /// Responses, surveys and answers are fetched as three independent
    /// queries over one read-only snapshot and grouped in
    /// [`assemble_completed`]. A response whose survey is missing is logged
    /// and skipped.
    pub async fn completed_surveys_for(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AssembledSurvey>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM survey_responses
             WHERE user_id = $1 AND completed = true
             ORDER BY created_at, id"
        );
        let responses = sqlx::query_as::<_, SurveyResponse>(&query)
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?;
        if responses.is_empty() {
            tx.commit().await?;
            return Ok(Vec::new());
        }

        let response_ids: Vec<DbId> = responses.iter().map(|r| r.id).collect();
        let mut survey_ids: Vec<DbId> = responses.iter().map(|r| r.survey_id).collect();
        survey_ids.sort_unstable();
        survey_ids.dedup();

        let surveys = SurveyRepo::outlines_by_ids_with(&mut *tx, &survey_ids).await?;

        let query =
            format!("SELECT {ANSWER_COLUMNS} FROM answers WHERE survey_response_id = ANY($1)");
        let answers = sqlx::query_as::<_, Answer>(&query)
            .bind(&response_ids)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let headers: Vec<ResponseHeader> = responses.iter().map(ResponseHeader::from).collect();
        let answers: Vec<AnswerRecord> = answers.into_iter().map(AnswerRecord::from).collect();
        let assembly = assemble_completed(&headers, &surveys, &answers);

        for anomaly in &assembly.anomalies {
            tracing::warn!(
                user_id,
                response_id = anomaly.response_id,
                survey_id = anomaly.survey_id,
                "Skipping survey response whose survey no longer exists",
            );
        }
        Ok(assembly.surveys)
    }

    /// Every survey (with questions), flagged by whether the user has any
    /// response to it, completed or not.
    pub async fn surveys_with_completion_flag(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SurveyWithCompletion>, sqlx::Error> {
        let mut conn = pool.acquire().await?;

        let responded: HashSet<DbId> = sqlx::query_scalar::<_, DbId>(
            "SELECT DISTINCT survey_id FROM survey_responses WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();

        let surveys = SurveyRepo::list_outlines_with(&mut *conn).await?;
        Ok(annotate_completion(surveys, &responded))
    }
}
