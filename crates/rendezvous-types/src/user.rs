//! User account and per-user assistant settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default `preferred_language` applied when settings are first created.
pub const DEFAULT_PREFERRED_LANGUAGE: &str = "en";

/// Default `tone_of_voice` applied when settings are first created.
pub const DEFAULT_TONE_OF_VOICE: &str = "formal";

/// Column width of `user_settings.preferred_language`.
pub const MAX_PREFERRED_LANGUAGE_LEN: usize = 10;

/// Column width of `user_settings.tone_of_voice`.
pub const MAX_TONE_OF_VOICE_LEN: usize = 50;

/// A registered user. Identified by email for login, by `id` everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// PHC-formatted argon2 hash. Never serialized.
    #[serde(skip)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to register a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Per-user assistant preferences, one-to-one with a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(skip)]
    pub user_id: Uuid,
    pub preferred_language: String,
    pub tone_of_voice: String,
}

impl UserSettings {
    /// Settings with the defaults applied on first access.
    pub fn defaults_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            preferred_language: DEFAULT_PREFERRED_LANGUAGE.to_string(),
            tone_of_voice: DEFAULT_TONE_OF_VOICE.to_string(),
        }
    }
}

/// Partial update for [`UserSettings`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettingsRequest {
    pub preferred_language: Option<String>,
    pub tone_of_voice: Option<String>,
}

/// Normalize an email address: trim whitespace and lowercase the domain.
///
/// The local part is left as typed. Returns `None` if the address does not
/// have exactly one `@` with non-empty text on both sides.
pub fn normalize_email(email: &str) -> Option<String> {
    let email = email.trim();
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    if email.chars().any(char::is_whitespace) {
        return None;
    }
    Some(format!("{local}@{}", domain.to_lowercase()))
}
