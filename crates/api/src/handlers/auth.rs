//! Handlers for the `/auth` resource (login, register, change password).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use explorers_core::error::CoreError;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::services::auth::AuthSession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub username: String,
    pub old_password: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns the session token in the
/// body and in the `Authorization` response header.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let session = state
        .auth
        .authenticate(&input.username, &input.password)
        .await?;

    session_response(StatusCode::OK, "Login successful", session)
}

/// POST /api/v1/auth/register
///
/// Create an account and sign it in. Responds 201.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let session = state
        .auth
        .register(&input.username, &input.email, &input.password)
        .await?;

    session_response(StatusCode::CREATED, "Registration successful", session)
}

/// POST /api/v1/auth/change-password
///
/// The current password authorizes the change; no session is required.
pub async fn change_password(
    State(state): State<AppState>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    let Json(input) = payload?;
    state
        .auth
        .change_password(&input.username, &input.old_password, &input.new_password)
        .await?;

    Ok(Json(ApiResponse::message("Password changed successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Envelope the session and mirror its token into the `Authorization` header.
fn session_response(
    status: StatusCode,
    message: &str,
    session: AuthSession,
) -> AppResult<impl IntoResponse> {
    let header = HeaderValue::from_str(&format!("Bearer {}", session.token))
        .map_err(|e| CoreError::Internal(format!("Token is not a valid header value: {e}")))?;

    Ok((
        status,
        AppendHeaders([(AUTHORIZATION, header)]),
        Json(ApiResponse::ok(message, session)),
    ))
}
