//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use rendezvous_types::error::{ChatError, UserError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat orchestration errors.
    Chat(ChatError),
    /// Account and settings errors.
    User(UserError),
    /// Authentication failure.
    Unauthorized(String),
    /// Validation error.
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        AppError::User(e)
    }
}

impl AppError {
    /// Status code, machine-readable code, and message for this error.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(e @ ChatError::ConversationNotFound(_)) => {
                (StatusCode::NOT_FOUND, "CONVERSATION_NOT_FOUND", e.to_string())
            }
            AppError::Chat(ChatError::Forbidden(_)) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Conversation belongs to another user".to_string(),
            ),
            AppError::Chat(ChatError::AssistantUnavailable(msg)) => (
                StatusCode::BAD_GATEWAY,
                "ASSISTANT_UNAVAILABLE",
                format!("Assistant unavailable: {msg}"),
            ),
            AppError::Chat(e @ ChatError::Attachment(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "ATTACHMENT_ERROR", e.to_string())
            }
            AppError::Chat(e @ ChatError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::User(
                e @ (UserError::InvalidEmail(_)
                | UserError::InvalidPassword(_)
                | UserError::InvalidSettings(_)),
            ) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            AppError::User(e @ UserError::EmailTaken(_)) => {
                (StatusCode::CONFLICT, "EMAIL_TAKEN", e.to_string())
            }
            AppError::User(e @ UserError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", e.to_string())
            }
            AppError::User(UserError::NotFound) => {
                (StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found".to_string())
            }
            AppError::User(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "USER_ERROR", e.to_string())
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        } else {
            tracing::debug!(code, %message, status = status.as_u16(), "request rejected");
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": uuid::Uuid::now_v7().to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
