//! Chat message handler.
//!
//! POST /api/v1/chat accepts either a JSON body `{"message": "..."}` or a
//! `multipart/form-data` body with a `message` text field and/or a `file`
//! part. The reply is generated, classified, and stored before responding.

use std::time::Instant;

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::Deserialize;

use rendezvous_types::chat::{Attachment, ChatMessage};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Largest accepted request body for the chat endpoint (20 MiB).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// JSON request body for a text-only message.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// POST /api/v1/chat - Send a message and receive the stored exchange.
pub async fn post_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    request: Request,
) -> Result<Json<ApiResponse<ChatMessage>>, AppError> {
    let start = Instant::now();

    let (text, attachment) = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        read_multipart(multipart).await?
    } else {
        let Json(body) = Json::<ChatRequest>::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        (body.message, None)
    };

    let stored = state
        .chat_service
        .handle_message(user.id, text, attachment)
        .await?;

    let resp = ApiResponse::timed(stored, start)
        .with_link("conversations", "/api/v1/conversations");
    Ok(Json(resp))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// Collect the `message` and `file` parts. Unknown parts are ignored.
async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(Option<String>, Option<Attachment>), AppError> {
    let mut text = None;
    let mut attachment = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("message") => {
                text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.body_text()))?,
                );
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                attachment = Some(Attachment::new(file_name, bytes.to_vec()));
            }
            other => {
                tracing::debug!(field = ?other, "ignoring unknown multipart field");
            }
        }
    }

    Ok((text, attachment))
}
