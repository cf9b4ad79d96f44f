//! Bearer token authentication extractor.
//!
//! Extracts the token from:
//! - `Authorization: Bearer <token>` header
//! - `X-API-Key: <token>` header
//!
//! Tokens are resolved to their owning user through `UserService`, which
//! compares SHA-256 digests against the `auth_tokens` table.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use rendezvous_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Extracting this validates the bearer token.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        match state.user_service.resolve_token(&token).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(AppError::Unauthorized(
                "Invalid token. Provide a valid token via 'Authorization: Bearer <token>' or 'X-API-Key: <token>' header.".to_string(),
            )),
        }
    }
}

/// Extract the token from request headers.
fn extract_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        let key_str = key_str.trim();
        if !key_str.is_empty() {
            return Ok(key_str.to_string());
        }
    }

    Err(AppError::Unauthorized(
        "Missing token. Provide via 'Authorization: Bearer <token>' or 'X-API-Key: <token>' header.".to_string(),
    ))
}
