//! Repository for the `surveys` and `questions` tables.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use tinnilog_core::assembly::SurveyOutline;
use tinnilog_core::error::CoreError;
use tinnilog_core::survey::{validate_question, validate_title};
use tinnilog_core::types::DbId;

use crate::models::survey::{CreateSurvey, Question, Survey};
use crate::StoreError;

/// Column list for `surveys` queries.
const SURVEY_COLUMNS: &str = "id, title, description, demographic, created_at, updated_at";

/// Column list for `questions` queries.
const QUESTION_COLUMNS: &str =
    "id, survey_id, text, question_type, options, created_at, updated_at";

/// Provides read access to surveys with their questions, plus authoring.
pub struct SurveyRepo;

impl SurveyRepo {
    /// Create a survey and all of its questions in one transaction.
    ///
    /// Questions keep the order given; that order is what readers see.
    pub async fn create_with_questions(
        pool: &PgPool,
        input: &CreateSurvey,
    ) -> Result<SurveyOutline, StoreError> {
        validate_title(&input.title)?;
        if input.questions.is_empty() {
            return Err(CoreError::Validation("A survey needs at least one question".into()).into());
        }
        for q in &input.questions {
            validate_question(&q.text, &q.question_type, q.options.as_deref())?;
        }

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO surveys (title, description, demographic)
             VALUES ($1, $2, $3)
             RETURNING {SURVEY_COLUMNS}"
        );
        let survey = sqlx::query_as::<_, Survey>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.demographic)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO questions (survey_id, text, question_type, options)
             VALUES ($1, $2, $3, $4)
             RETURNING {QUESTION_COLUMNS}"
        );
        let mut questions = Vec::with_capacity(input.questions.len());
        for q in &input.questions {
            let options = q.options.clone().map(serde_json::Value::from);
            let question = sqlx::query_as::<_, Question>(&query)
                .bind(survey.id)
                .bind(&q.text)
                .bind(&q.question_type)
                .bind(options)
                .fetch_one(&mut *tx)
                .await?;
            questions.push(question);
        }

        tx.commit().await?;

        tracing::info!(
            survey_id = survey.id,
            question_count = questions.len(),
            demographic = survey.demographic,
            "Survey created",
        );
        Ok(survey.into_outline(questions))
    }

    /// Find a survey row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Survey>, sqlx::Error> {
        let query = format!("SELECT {SURVEY_COLUMNS} FROM surveys WHERE id = $1");
        sqlx::query_as::<_, Survey>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a survey with its questions.
    pub async fn find_outline(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SurveyOutline>, sqlx::Error> {
        let Some(survey) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let mut conn = pool.acquire().await?;
        let mut outlines = Self::attach_questions(&mut *conn, vec![survey]).await?;
        Ok(outlines.pop())
    }

    /// Find the survey marked as the demographic survey, with its questions.
    ///
    /// Should more than one be flagged, the oldest wins.
    pub async fn find_demographic(pool: &PgPool) -> Result<Option<SurveyOutline>, sqlx::Error> {
        let query = format!(
            "SELECT {SURVEY_COLUMNS} FROM surveys WHERE demographic = true ORDER BY id LIMIT 1"
        );
        let Some(survey) = sqlx::query_as::<_, Survey>(&query)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let mut conn = pool.acquire().await?;
        let mut outlines = Self::attach_questions(&mut *conn, vec![survey]).await?;
        Ok(outlines.pop())
    }

    /// List every survey with its questions, oldest first, on the caller's
    /// connection.
    pub async fn list_outlines_with(
        conn: &mut PgConnection,
    ) -> Result<Vec<SurveyOutline>, sqlx::Error> {
        let query = format!("SELECT {SURVEY_COLUMNS} FROM surveys ORDER BY id");
        let surveys = sqlx::query_as::<_, Survey>(&query)
            .fetch_all(&mut *conn)
            .await?;
        Self::attach_questions(conn, surveys).await
    }

    /// Load the given surveys (with questions) by ID on the caller's
    /// connection. IDs that no longer exist are simply absent from the result.
    pub async fn outlines_by_ids_with(
        conn: &mut PgConnection,
        ids: &[DbId],
    ) -> Result<Vec<SurveyOutline>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query =
            format!("SELECT {SURVEY_COLUMNS} FROM surveys WHERE id = ANY($1) ORDER BY id");
        let surveys = sqlx::query_as::<_, Survey>(&query)
            .bind(ids)
            .fetch_all(&mut *conn)
            .await?;
        Self::attach_questions(conn, surveys).await
    }

    /// IDs of all questions on a survey.
    pub async fn question_ids_with(
        conn: &mut PgConnection,
        survey_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM questions WHERE survey_id = $1")
            .bind(survey_id)
            .fetch_all(conn)
            .await
    }

    /// Fetch questions for `surveys` in one query and group them per survey.
    async fn attach_questions(
        conn: &mut PgConnection,
        surveys: Vec<Survey>,
    ) -> Result<Vec<SurveyOutline>, sqlx::Error> {
        if surveys.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DbId> = surveys.iter().map(|s| s.id).collect();
        let query = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE survey_id = ANY($1) ORDER BY id"
        );
        let questions = sqlx::query_as::<_, Question>(&query)
            .bind(&ids)
            .fetch_all(conn)
            .await?;

        let mut by_survey: HashMap<DbId, Vec<Question>> = HashMap::new();
        for q in questions {
            by_survey.entry(q.survey_id).or_default().push(q);
        }

        Ok(surveys
            .into_iter()
            .map(|s| {
                let questions = by_survey.remove(&s.id).unwrap_or_default();
                s.into_outline(questions)
            })
            .collect())
    }
}
