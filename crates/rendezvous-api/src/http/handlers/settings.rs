//! Per-user settings handlers.
//!
//! Endpoints:
//! - GET /api/v1/settings - Read settings (created with defaults on first access)
//! - PUT /api/v1/settings - Partially update settings

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use rendezvous_types::user::{UpdateSettingsRequest, UserSettings};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/settings - Read the caller's settings.
pub async fn get_settings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<UserSettings>>, AppError> {
    let start = Instant::now();

    let settings = state.user_service.get_settings(&user.id).await?;

    Ok(Json(
        ApiResponse::timed(settings, start).with_link("self", "/api/v1/settings"),
    ))
}

/// PUT /api/v1/settings - Update the fields present in the body.
pub async fn update_settings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<UserSettings>>, AppError> {
    let start = Instant::now();

    let settings = state.user_service.update_settings(&user.id, body).await?;

    Ok(Json(
        ApiResponse::timed(settings, start).with_link("self", "/api/v1/settings"),
    ))
}
