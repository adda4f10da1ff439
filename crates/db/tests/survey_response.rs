//! Integration tests for survey submission and result assembly.
//!
//! Exercises the reconciler against a real database:
//! - Resubmission replaces the prior response and all of its answers
//! - A failure mid-transaction leaves the prior response intact
//! - Concurrent submissions for one key leave exactly one response
//! - Demographic completion is flagged with the submission
//! - Assembled results render unanswered questions explicitly

use assert_matches::assert_matches;
use sqlx::PgPool;
use tinnilog_core::assembly::SurveyOutline;
use tinnilog_core::error::CoreError;
use tinnilog_core::survey::SubmittedAnswer;
use tinnilog_db::models::survey::{CreateQuestion, CreateSurvey};
use tinnilog_db::models::survey_response::SubmitSurveyResponse;
use tinnilog_db::models::user::{CreateUser, User};
use tinnilog_db::repositories::{SurveyRepo, SurveyResponseRepo, UserRepo};
use tinnilog_db::StoreError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

fn text_question(text: &str) -> CreateQuestion {
    CreateQuestion {
        text: text.to_string(),
        question_type: "text".to_string(),
        options: None,
    }
}

/// Create a non-demographic survey with two text questions.
async fn create_survey(pool: &PgPool, title: &str) -> SurveyOutline {
    SurveyRepo::create_with_questions(
        pool,
        &CreateSurvey {
            title: title.to_string(),
            description: Some("test survey".to_string()),
            demographic: false,
            questions: vec![text_question("First?"), text_question("Second?")],
        },
    )
    .await
    .expect("survey creation should succeed")
}

fn submission(answers: &[(i64, &str)]) -> SubmitSurveyResponse {
    SubmitSurveyResponse {
        noise_level: 3.5,
        completed: true,
        answers: answers
            .iter()
            .map(|(question_id, response)| SubmittedAnswer {
                question_id: *question_id,
                response: response.to_string(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_then_assemble(pool: PgPool) {
    let user = create_user(&pool, "submitter").await;
    let survey = create_survey(&pool, "Noise at work").await;
    let (q1, q2) = (survey.questions[0].id, survey.questions[1].id);

    let input = submission(&[(q1, "A"), (q2, "B")]);
    let response = SurveyResponseRepo::submit(&pool, user.id, survey.id, &input)
        .await
        .unwrap();
    assert_eq!(response.noise_level, 3.5);
    assert!(response.completed);

    let results = SurveyResponseRepo::completed_surveys_for(&pool, user.id)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].survey_id, survey.id);
    assert_eq!(results[0].questions[0].answer.as_deref(), Some("A"));
    assert_eq!(results[0].questions[1].answer.as_deref(), Some("B"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resubmit_replaces_prior_response(pool: PgPool) {
    let user = create_user(&pool, "resubmitter").await;
    let survey = create_survey(&pool, "Sleep").await;
    let (q1, q2) = (survey.questions[0].id, survey.questions[1].id);

    let input = submission(&[(q1, "A"), (q2, "B")]);
    let first = SurveyResponseRepo::submit(&pool, user.id, survey.id, &input)
        .await
        .unwrap();
    let input = submission(&[(q1, "C")]);
    let second = SurveyResponseRepo::submit(&pool, user.id, survey.id, &input)
        .await
        .unwrap();

    let responses = SurveyResponseRepo::list_for_user_survey(&pool, user.id, survey.id)
        .await
        .unwrap();
    assert_eq!(
        responses.len(),
        1,
        "exactly one current response per (user, survey)"
    );
    assert_eq!(responses[0].id, second.id);

    let old_answers = SurveyResponseRepo::list_answers(&pool, first.id).await.unwrap();
    assert!(old_answers.is_empty(), "no residue of the old answer set");

    let new_answers = SurveyResponseRepo::list_answers(&pool, second.id).await.unwrap();
    assert_eq!(new_answers.len(), 1);
    assert_eq!(new_answers[0].question_id, q1);
    assert_eq!(new_answers[0].response, "C");

    let results = SurveyResponseRepo::completed_surveys_for(&pool, user.id)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].questions[0].answer.as_deref(), Some("C"));
    assert_eq!(results[0].questions[1].answer, None);
    assert!(!results[0].questions[1].answered);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failure_after_response_insert_rolls_back(pool: PgPool) {
    let user = create_user(&pool, "rollback").await;
    let survey = create_survey(&pool, "Stress").await;
    let (q1, q2) = (survey.questions[0].id, survey.questions[1].id);

    let input = submission(&[(q1, "A"), (q2, "B")]);
    let original = SurveyResponseRepo::submit(&pool, user.id, survey.id, &input)
        .await
        .unwrap();

    // Make the answer insert (step 4) fail after the new response row (step 3)
    // has been written inside the transaction.
    sqlx::query(
        "CREATE FUNCTION fail_answer_insert() RETURNS TRIGGER AS $$
         BEGIN
             RAISE EXCEPTION 'injected answer failure';
         END;
         $$ LANGUAGE plpgsql",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER trg_fail_answer_insert BEFORE INSERT ON answers
         FOR EACH ROW WHEN (NEW.response = 'BOOM') EXECUTE FUNCTION fail_answer_insert()",
    )
    .execute(&pool)
    .await
    .unwrap();

    let input = submission(&[(q1, "C"), (q2, "BOOM")]);
    let result = SurveyResponseRepo::submit(&pool, user.id, survey.id, &input).await;
    assert_matches!(result, Err(StoreError::Persistence(_)));

    let responses = SurveyResponseRepo::list_for_user_survey(&pool, user.id, survey.id)
        .await
        .unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].id, original.id, "the prior response survives");
    assert_eq!(responses[0].noise_level, original.noise_level);

    let answers = SurveyResponseRepo::list_answers(&pool, original.id).await.unwrap();
    let values: Vec<&str> = answers.iter().map(|a| a.response.as_str()).collect();
    assert_eq!(values, vec!["A", "B"]);

    let orphan_count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM survey_responses WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(orphan_count.0, 1, "no half-written response is visible");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_submissions_leave_one_response(pool: PgPool) {
    const SUBMITTERS: usize = 12;

    let user = create_user(&pool, "racer").await;
    let survey = create_survey(&pool, "Contended").await;
    let (user_id, survey_id, q1) = (user.id, survey.id, survey.questions[0].id);

    let handles: Vec<_> = (0..SUBMITTERS)
        .map(|i| {
            let pool = pool.clone();
            let input = submission(&[(q1, format!("answer-{i}").as_str())]);
            tokio::spawn(async move {
                SurveyResponseRepo::submit(&pool, user_id, survey_id, &input).await
            })
        })
        .collect();

    let mut committed = 0;
    for handle in handles {
        match handle.await.expect("submit task should not panic") {
            Ok(_) => committed += 1,
            Err(err) => assert!(err.is_retryable(), "non-retryable failure: {err}"),
        }
    }
    assert!(committed >= 1, "at least one submission commits");

    let responses = SurveyResponseRepo::list_for_user_survey(&pool, user.id, survey.id)
        .await
        .unwrap();
    assert_eq!(responses.len(), 1, "no duplicate responses under contention");

    let total_answers: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM answers a
         JOIN survey_responses r ON r.id = a.survey_response_id
         WHERE r.user_id = $1 AND r.survey_id = $2",
    )
    .bind(user.id)
    .bind(survey.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(total_answers.0, 1, "only the surviving answer set remains");

    let answers = SurveyResponseRepo::list_answers(&pool, responses[0].id)
        .await
        .unwrap();
    assert_eq!(answers.len(), 1);
    assert!(answers[0].response.starts_with("answer-"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_retrying_a_conflicted_submission_succeeds(pool: PgPool) {
    let user = create_user(&pool, "patient").await;
    let survey = create_survey(&pool, "Retried").await;
    let (user_id, survey_id, q1) = (user.id, survey.id, survey.questions[0].id);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pool = pool.clone();
            let input = submission(&[(q1, format!("attempt-{i}").as_str())]);
            tokio::spawn(async move {
                for _ in 0..50 {
                    match SurveyResponseRepo::submit(&pool, user_id, survey_id, &input).await {
                        Ok(response) => return response,
                        Err(err) if err.is_retryable() => continue,
                        Err(err) => panic!("non-retryable failure: {err}"),
                    }
                }
                panic!("submission kept conflicting");
            })
        })
        .collect();

    for handle in handles {
        handle.await.expect("every submission eventually commits");
    }

    let responses = SurveyResponseRepo::list_for_user_survey(&pool, user.id, survey.id)
        .await
        .unwrap();
    assert_eq!(responses.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_unknown_survey_is_not_found(pool: PgPool) {
    let user = create_user(&pool, "lost").await;

    let result =
        SurveyResponseRepo::submit(&pool, user.id, 999_999, &submission(&[(1, "A")])).await;

    assert_matches!(
        result,
        Err(StoreError::Core(CoreError::NotFound {
            entity: "Survey",
            id: 999_999
        }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_empty_answers_is_invalid(pool: PgPool) {
    let user = create_user(&pool, "silent").await;
    let survey = create_survey(&pool, "Empty").await;

    let result = SurveyResponseRepo::submit(&pool, user.id, survey.id, &submission(&[])).await;

    assert_matches!(result, Err(StoreError::Core(CoreError::Validation(_))));
    let responses = SurveyResponseRepo::list_for_user_survey(&pool, user.id, survey.id)
        .await
        .unwrap();
    assert!(responses.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_foreign_question_is_invalid(pool: PgPool) {
    let user = create_user(&pool, "stray").await;
    let survey = create_survey(&pool, "Mine").await;
    let other = create_survey(&pool, "Other").await;

    let result = SurveyResponseRepo::submit(
        &pool,
        user.id,
        survey.id,
        &submission(&[(other.questions[0].id, "A")]),
    )
    .await;

    assert_matches!(result, Err(StoreError::Core(CoreError::Validation(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_noise_level_is_stored(pool: PgPool) {
    let user = create_user(&pool, "quiet").await;
    let survey = create_survey(&pool, "Headphones").await;

    let input = SubmitSurveyResponse {
        noise_level: -12.5,
        ..submission(&[(survey.questions[0].id, "A")])
    };
    let response = SurveyResponseRepo::submit(&pool, user.id, survey.id, &input)
        .await
        .unwrap();
    assert_eq!(response.noise_level, -12.5);

    let input = SubmitSurveyResponse {
        noise_level: f64::NAN,
        ..submission(&[(survey.questions[0].id, "B")])
    };
    let result = SurveyResponseRepo::submit(&pool, user.id, survey.id, &input).await;
    assert_matches!(result, Err(StoreError::Core(CoreError::Validation(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_demographic_submission_flags_user(pool: PgPool) {
    let user = create_user(&pool, "demo").await;
    assert!(!user.demographic);

    let survey = SurveyRepo::find_demographic(&pool)
        .await
        .unwrap()
        .expect("seeded demographic survey should exist");
    let first_question = survey.questions[0].id;

    let input = submission(&[(first_question, "34")]);
    SurveyResponseRepo::submit(&pool, user.id, survey.id, &input)
        .await
        .unwrap();

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(reloaded.demographic);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_regular_submission_leaves_demographic_flag(pool: PgPool) {
    let user = create_user(&pool, "plain").await;
    let survey = create_survey(&pool, "Plain").await;

    let input = submission(&[(survey.questions[0].id, "x")]);
    SurveyResponseRepo::submit(&pool, user.id, survey.id, &input)
        .await
        .unwrap();

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(!reloaded.demographic);
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_incomplete_responses_not_assembled(pool: PgPool) {
    let user = create_user(&pool, "drafter").await;
    let survey = create_survey(&pool, "Draft").await;

    let mut draft = submission(&[(survey.questions[0].id, "half")]);
    draft.completed = false;
    SurveyResponseRepo::submit(&pool, user.id, survey.id, &draft)
        .await
        .unwrap();

    let results = SurveyResponseRepo::completed_surveys_for(&pool, user.id)
        .await
        .unwrap();
    assert!(results.is_empty());

    // The completion flag counts any response, completed or not.
    let flagged = SurveyResponseRepo::surveys_with_completion_flag(&pool, user.id)
        .await
        .unwrap();
    let entry = flagged
        .iter()
        .find(|s| s.survey.id == survey.id)
        .expect("survey should be listed");
    assert!(entry.completed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_completion_flag_is_per_user(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let survey = create_survey(&pool, "Shared").await;

    let input = submission(&[(survey.questions[0].id, "yes")]);
    SurveyResponseRepo::submit(&pool, alice.id, survey.id, &input)
        .await
        .unwrap();

    let for_bob = SurveyResponseRepo::surveys_with_completion_flag(&pool, bob.id)
        .await
        .unwrap();
    assert!(for_bob.iter().all(|s| !s.completed));

    let for_alice = SurveyResponseRepo::surveys_with_completion_flag(&pool, alice.id)
        .await
        .unwrap();
    let shared = for_alice.iter().find(|s| s.survey.id == survey.id).unwrap();
    assert!(shared.completed);
    assert_eq!(shared.survey.questions.len(), 2);

    let bob_results = SurveyResponseRepo::completed_surveys_for(&pool, bob.id)
        .await
        .unwrap();
    assert!(bob_results.is_empty());
}
