//! User repository trait definition.

use rendezvous_types::error::RepositoryError;
use rendezvous_types::user::{User, UserSettings};
use uuid::Uuid;

/// Repository trait for user accounts, API tokens, and per-user settings.
///
/// Implementations live in rendezvous-infra (e.g., SqliteUserRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Returns `Conflict` if the email is already taken.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Look up a user by (normalized) email.
    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Return the user's settings, inserting the defaults on first access.
    fn get_or_create_settings(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<UserSettings, RepositoryError>> + Send;

    /// Upsert the user's settings.
    fn save_settings(
        &self,
        settings: &UserSettings,
    ) -> impl std::future::Future<Output = Result<UserSettings, RepositoryError>> + Send;

    /// Store the hash of a freshly issued API token.
    fn create_token(
        &self,
        user_id: &Uuid,
        token_hash: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Resolve a token hash to its owning user.
    fn find_user_by_token(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Record that a token was just used.
    fn touch_token(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
