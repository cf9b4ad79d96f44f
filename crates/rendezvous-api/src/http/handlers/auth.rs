//! Account registration and token issuance handlers.
//!
//! Endpoints:
//! - POST /api/v1/auth/register - Create an account
//! - POST /api/v1/auth/token    - Exchange email + password for a bearer token

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use rendezvous_types::user::{RegisterUserRequest, User};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Token name recorded when the caller does not supply one.
const DEFAULT_TOKEN_NAME: &str = "api";

/// Request body for token issuance.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
    /// Label stored with the token (e.g. the client it was issued to).
    #[serde(default)]
    pub name: Option<String>,
}

/// Response body carrying a freshly issued token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/v1/auth/register - Create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let start = Instant::now();

    let user = state.user_service.register(body).await?;

    let resp = ApiResponse::timed(user, start).with_link("token", "/api/v1/auth/token");
    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /api/v1/auth/token - Issue a bearer token for valid credentials.
///
/// The plaintext token appears only in this response.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, AppError> {
    let start = Instant::now();

    let user = state
        .user_service
        .authenticate(&body.email, &body.password)
        .await?;

    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_TOKEN_NAME);
    let token = state.user_service.issue_token(&user, name).await?;

    Ok(Json(ApiResponse::timed(TokenResponse { token }, start)))
}
