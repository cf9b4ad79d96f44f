//! User account service.
//!
//! Registration, password authentication, API token issuance and lookup,
//! and per-user assistant settings.

use chrono::Utc;
use rendezvous_types::error::{RepositoryError, UserError};
use rendezvous_types::user::{
    MAX_PREFERRED_LANGUAGE_LEN, MAX_TONE_OF_VOICE_LEN, RegisterUserRequest, UpdateSettingsRequest,
    User, UserSettings, normalize_email,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::repository::user::UserRepository;
use crate::service::hash::CredentialHasher;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Service orchestrating user accounts and credentials.
///
/// Generic over repository and hashing traits to maintain clean
/// architecture -- rendezvous-core never depends on rendezvous-infra.
pub struct UserService<U: UserRepository, H: CredentialHasher> {
    user_repo: U,
    hasher: H,
}

impl<U: UserRepository, H: CredentialHasher> UserService<U, H> {
    pub fn new(user_repo: U, hasher: H) -> Self {
        Self { user_repo, hasher }
    }

    /// Register a new user.
    ///
    /// The email is normalized before the uniqueness check, so addresses
    /// differing only in domain case collide.
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, UserError> {
        let email = normalize_email(&request.email)
            .ok_or_else(|| UserError::InvalidEmail(request.email.trim().to_string()))?;

        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(UserError::InvalidPassword(format!(
                "must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self.user_repo.find_user_by_email(&email).await?.is_some() {
            return Err(UserError::EmailTaken(email));
        }

        let user = User {
            id: Uuid::now_v7(),
            email: email.clone(),
            password_hash: self.hasher.hash_password(&request.password)?,
            first_name: non_blank(request.first_name),
            last_name: non_blank(request.last_name),
            created_at: Utc::now(),
        };

        let user = self.user_repo.create_user(&user).await.map_err(|e| match e {
            // Lost a race with a concurrent registration of the same email.
            RepositoryError::Conflict(_) => UserError::EmailTaken(email),
            other => UserError::Storage(other),
        })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Verify an email/password pair.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let Some(email) = normalize_email(email) else {
            return Err(UserError::InvalidCredentials);
        };
        let user = self
            .user_repo
            .find_user_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.hasher.verify_password(password, &user.password_hash) {
            debug!(user_id = %user.id, "password verification failed");
            return Err(UserError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Issue a new API token for `user`. The plaintext is returned once and
    /// only its hash is stored.
    pub async fn issue_token(&self, user: &User, name: &str) -> Result<String, UserError> {
        let token = self.hasher.generate_token();
        let token_hash = self.hasher.hash_token(&token);
        self.user_repo
            .create_token(&user.id, &token_hash, name)
            .await?;
        info!(user_id = %user.id, token_name = name, "api token issued");
        Ok(token)
    }

    /// Resolve a plaintext bearer token to its user.
    ///
    /// Updating `last_used_at` is best-effort and never fails the lookup.
    pub async fn resolve_token(&self, token: &str) -> Result<Option<User>, UserError> {
        let token_hash = self.hasher.hash_token(token);
        let user = self.user_repo.find_user_by_token(&token_hash).await?;
        if user.is_some() {
            if let Err(e) = self.user_repo.touch_token(&token_hash).await {
                warn!(error = %e, "failed to update token last_used_at");
            }
        }
        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<User, UserError> {
        let email =
            normalize_email(email).ok_or_else(|| UserError::InvalidEmail(email.to_string()))?;
        self.user_repo
            .find_user_by_email(&email)
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Get the user's settings, creating the defaults on first access.
    pub async fn get_settings(&self, user_id: &Uuid) -> Result<UserSettings, UserError> {
        Ok(self.user_repo.get_or_create_settings(user_id).await?)
    }

    /// Apply a partial settings update. Absent fields keep their value.
    pub async fn update_settings(
        &self,
        user_id: &Uuid,
        update: UpdateSettingsRequest,
    ) -> Result<UserSettings, UserError> {
        let mut settings = self.user_repo.get_or_create_settings(user_id).await?;

        if let Some(language) = update.preferred_language {
            settings.preferred_language =
                validate_setting("preferred_language", &language, MAX_PREFERRED_LANGUAGE_LEN)?;
        }
        if let Some(tone) = update.tone_of_voice {
            settings.tone_of_voice =
                validate_setting("tone_of_voice", &tone, MAX_TONE_OF_VOICE_LEN)?;
        }

        Ok(self.user_repo.save_settings(&settings).await?)
    }
}

fn validate_setting(field: &str, value: &str, max_len: usize) -> Result<String, UserError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(UserError::InvalidSettings(format!("{field} cannot be empty")));
    }
    if value.chars().count() > max_len {
        return Err(UserError::InvalidSettings(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
