//! HTTP-level tests for registration, login and token handling.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_token_and_profile(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let body = json!({
        "username": "ana",
        "email": "ana@example.com",
        "password": "correct-horse-battery",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert_eq!(json["data"]["expires_in"], 3600);
    assert_eq!(json["data"]["user"]["username"], "ana");
    assert_eq!(json["data"]["user"]["demographic"], false);
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "username": "ana", "email": "ana@example.com", "password": "short" });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_blank_username(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "username": "  ", "email": "x@example.com", "password": "long-enough-pw" });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_taken_username_and_email(pool: PgPool) {
    common::register_user(&pool, "ana").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({
        "username": "ana",
        "email": "other@example.com",
        "password": "long-enough-pw",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool);
    let body = json!({
        "username": "bea",
        "email": "ana@example.com",
        "password": "long-enough-pw",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_succeeds_with_correct_password(pool: PgPool) {
    let (user_id, _) = common::register_user(&pool, "ana").await;
    let app = common::build_test_app(pool);

    let body = json!({ "username": "ana", "password": "correct-horse-battery" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["id"], user_id);
    assert!(json["data"]["access_token"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_failures_share_one_message(pool: PgPool) {
    common::register_user(&pool, "ana").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "username": "ana", "password": "wrong-password" });
    let wrong_password = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let body = json!({ "username": "ghost", "password": "whatever-pw" });
    let unknown_user = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(
        body_json(wrong_password).await["error"],
        body_json(unknown_user).await["error"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticate_accepts_valid_token(pool: PgPool) {
    let (_, token) = common::register_user(&pool, "ana").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/auth/authenticate", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["valid"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_routes_reject_missing_or_bad_tokens(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/surveys", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_and_user_listing(pool: PgPool) {
    let (ana_id, token) = common::register_user(&pool, "ana").await;
    common::register_user(&pool, "bea").await;

    let app = common::build_test_app(pool.clone());
    let me = body_json(get_auth(app, "/api/v1/auth/me", &token).await).await;
    assert_eq!(me["data"]["id"], ana_id);
    assert_eq!(me["data"]["email"], "ana@example.com");

    let app = common::build_test_app(pool);
    let users = body_json(get_auth(app, "/api/v1/users", &token).await).await;
    let names: Vec<&str> = users["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ana", "bea"]);
    assert!(users["data"][0].get("email").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn change_password_requires_current_password(pool: PgPool) {
    let (_, token) = common::register_user(&pool, "ana").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "current_password": "not-my-password", "new_password": "brand-new-secret" });
    let response = put_json_auth(app, "/api/v1/auth/password", body, &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool.clone());
    let body = json!({
        "current_password": "correct-horse-battery",
        "new_password": "brand-new-secret",
    });
    let response = put_json_auth(app, "/api/v1/auth/password", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let body = json!({ "username": "ana", "password": "brand-new-secret" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}
