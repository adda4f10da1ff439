//! Handlers for the `/auth` resource (register, login, token check, profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tinnilog_core::error::CoreError;
use tinnilog_core::types::DbId;
use tinnilog_db::models::user::{CreateUser, User, UserResponse};
use tinnilog_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Message shared by every credential failure so callers cannot tell which usernames exist.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `PUT /auth/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and its default settings, then sign the user in.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let username = input.username.trim();
    let email = input.email.trim();

    if username.is_empty() {
        return Err(CoreError::Validation("username must not be blank".into()).into());
    }
    if email.is_empty() {
        return Err(CoreError::Validation("email must not be blank".into()).into());
    }
    validate_password_strength(&input.password).map_err(CoreError::Validation)?;

    if UserRepo::find_by_username(&state.pool, username)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict(format!("Username '{username}' is already taken")).into());
    }
    if UserRepo::find_by_email(&state.pool, email).await?.is_some() {
        return Err(CoreError::Conflict(format!("Email '{email}' is already registered")).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // A concurrent registration that slips past the checks above still
    // fails on uq_users_username / uq_users_email and maps to 409.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let response = build_auth_response(&state, user)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password and issue an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: bad password");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    tracing::info!(user_id = user.id, "User logged in");

    let response = build_auth_response(&state, user)?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/authenticate
///
/// Succeeds only when the bearer token is valid and unexpired.
pub async fn authenticate(_auth_user: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: json!({ "valid": true }),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user = load_user(&state, auth_user.user_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/auth/password
///
/// Replace the caller's password after re-checking the current one.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<impl IntoResponse> {
    let user = load_user(&state, auth_user.user_id).await?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(CoreError::Unauthorized("Current password is incorrect".into()).into());
    }

    validate_password_strength(&input.new_password).map_err(CoreError::Validation)?;

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &new_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");

    Ok(Json(DataResponse {
        data: json!({ "changed": true }),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the authenticated user, treating a vanished row as an invalid token.
async fn load_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))
}

fn build_auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from(user),
    })
}
