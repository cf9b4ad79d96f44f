//! Conversation history handlers.
//!
//! Endpoints:
//! - GET /api/v1/conversations               - List the caller's conversations
//! - GET /api/v1/conversations/{id}/messages - Messages of one conversation

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use rendezvous_types::chat::{ChatMessage, Conversation};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Conversation as listed to its owner.
#[derive(Debug, Serialize)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationSummary {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            title: c.title,
            created_at: c.created_at,
        }
    }
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// GET /api/v1/conversations - List the caller's conversations, newest first.
pub async fn list_conversations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<ConversationSummary>>>, AppError> {
    let start = Instant::now();

    let conversations: Vec<ConversationSummary> = state
        .chat_service
        .list_conversations(user.id)
        .await?
        .into_iter()
        .map(ConversationSummary::from)
        .collect();

    Ok(Json(
        ApiResponse::timed(conversations, start).with_link("self", "/api/v1/conversations"),
    ))
}

/// GET /api/v1/conversations/{id}/messages - Messages oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(conversation_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let start = Instant::now();
    let cid = parse_uuid(&conversation_id)?;

    let messages = state.chat_service.list_messages(cid, user.id).await?;

    Ok(Json(ApiResponse::timed(messages, start).with_link(
        "self",
        &format!("/api/v1/conversations/{cid}/messages"),
    )))
}
