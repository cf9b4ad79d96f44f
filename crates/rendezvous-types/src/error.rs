use thiserror::Error;
use uuid::Uuid;

/// Errors from repository operations (used by trait definitions in rendezvous-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the chat service.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing or malformed input; nothing was persisted.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("conversation {0} not found")]
    ConversationNotFound(Uuid),

    /// The conversation exists but belongs to another user.
    #[error("conversation {0} belongs to another user")]
    Forbidden(Uuid),

    /// The assistant call failed or timed out; nothing was persisted.
    #[error("assistant unavailable: {0}")]
    AssistantUnavailable(String),

    #[error("attachment error: {0}")]
    Attachment(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors related to user accounts, credentials, and settings.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("invalid password: {0}")]
    InvalidPassword(String),

    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("user not found")]
    NotFound,

    #[error("password hashing error: {0}")]
    Hashing(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}
