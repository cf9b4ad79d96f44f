//! SQLite user repository implementation.
//!
//! Users, hashed API tokens, and per-user settings.

use chrono::Utc;
use rendezvous_core::repository::user::UserRepository;
use rendezvous_types::error::RepositoryError;
use rendezvous_types::user::{User, UserSettings};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `UserRepository`.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: parse_uuid(&self.id, "user id")?,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn map_user_row(row: Option<sqlx::sqlite::SqliteRow>) -> Result<Option<User>, RepositoryError> {
    match row {
        Some(row) => {
            let user_row =
                UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            Ok(Some(user_row.into_user()?))
        }
        None => Ok(None),
    }
}

fn map_settings_row(
    user_id: &Uuid,
    row: &sqlx::sqlite::SqliteRow,
) -> Result<UserSettings, RepositoryError> {
    Ok(UserSettings {
        user_id: *user_id,
        preferred_language: row
            .try_get("preferred_language")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        tone_of_voice: row
            .try_get("tone_of_voice")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
    })
}

impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO users (id, email, password_hash, first_name, last_name, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(user.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("email '{}' already exists", user.email)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_user_row(row)
    }

    async fn get_or_create_settings(&self, user_id: &Uuid) -> Result<UserSettings, RepositoryError> {
        let defaults = UserSettings::defaults_for(*user_id);

        sqlx::query(
            "INSERT OR IGNORE INTO user_settings (user_id, preferred_language, tone_of_voice) VALUES (?, ?, ?)",
        )
        .bind(user_id.to_string())
        .bind(&defaults.preferred_language)
        .bind(&defaults.tone_of_voice)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let row = sqlx::query(
            "SELECT preferred_language, tone_of_voice FROM user_settings WHERE user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_settings_row(user_id, &row)
    }

    async fn save_settings(&self, settings: &UserSettings) -> Result<UserSettings, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO user_settings (user_id, preferred_language, tone_of_voice)
               VALUES (?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                   preferred_language = excluded.preferred_language,
                   tone_of_voice = excluded.tone_of_voice"#,
        )
        .bind(settings.user_id.to_string())
        .bind(&settings.preferred_language)
        .bind(&settings.tone_of_voice)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(settings.clone())
    }

    async fn create_token(
        &self,
        user_id: &Uuid,
        token_hash: &str,
        name: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO auth_tokens (id, user_id, token_hash, name, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(user_id.to_string())
        .bind(token_hash)
        .bind(name)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn find_user_by_token(&self, token_hash: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT u.* FROM users u
               JOIN auth_tokens t ON t.user_id = u.id
               WHERE t.token_hash = ?"#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_user_row(row)
    }

    async fn touch_token(&self, token_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE auth_tokens SET last_used_at = ? WHERE token_hash = ?")
            .bind(format_datetime(&Utc::now()))
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_pool;

    fn make_user(email: &str) -> User {
        User {
            id: Uuid::now_v7(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$test".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let user = make_user("ada@example.com");
        repo.create_user(&user).await.unwrap();

        let found = repo
            .find_user_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, user.password_hash);
        assert_eq!(found.first_name.as_deref(), Some("Ada"));

        assert!(repo.find_user_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = SqliteUserRepository::new(test_pool().await);
        repo.create_user(&make_user("ada@example.com")).await.unwrap();

        let err = repo
            .create_user(&make_user("ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_settings_created_lazily_and_saved() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let user = make_user("ada@example.com");
        repo.create_user(&user).await.unwrap();

        let settings = repo.get_or_create_settings(&user.id).await.unwrap();
        assert_eq!(settings.preferred_language, "en");
        assert_eq!(settings.tone_of_voice, "formal");

        let mut changed = settings.clone();
        changed.tone_of_voice = "casual".to_string();
        repo.save_settings(&changed).await.unwrap();

        let reread = repo.get_or_create_settings(&user.id).await.unwrap();
        assert_eq!(reread.tone_of_voice, "casual");
        assert_eq!(reread.preferred_language, "en");
    }

    #[tokio::test]
    async fn test_settings_length_enforced_by_schema() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let user = make_user("ada@example.com");
        repo.create_user(&user).await.unwrap();

        let mut settings = UserSettings::defaults_for(user.id);
        settings.preferred_language = "x".repeat(11);
        assert!(repo.save_settings(&settings).await.is_err());
    }

    #[tokio::test]
    async fn test_token_lookup_and_touch() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool.clone());
        let user = make_user("ada@example.com");
        repo.create_user(&user).await.unwrap();

        repo.create_token(&user.id, "hash-abc", "cli").await.unwrap();

        let found = repo.find_user_by_token("hash-abc").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.find_user_by_token("hash-other").await.unwrap().is_none());

        repo.touch_token("hash-abc").await.unwrap();
        let (last_used,): (Option<String>,) =
            sqlx::query_as("SELECT last_used_at FROM auth_tokens WHERE token_hash = ?")
                .bind("hash-abc")
                .fetch_one(&pool.reader)
                .await
                .unwrap();
        assert!(last_used.is_some());
    }
}
