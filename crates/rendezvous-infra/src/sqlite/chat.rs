//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `rendezvous-core` using sqlx with split read/write pools.
//! Follows the same patterns as `SqliteUserRepository`: raw queries, private Row structs,
//! split reader/writer pool usage.

use chrono::Utc;
use rendezvous_core::chat::repository::ChatRepository;
use rendezvous_types::chat::{ChatMessage, Conversation, NewMessage, Sentiment};
use rendezvous_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `ChatRepository`.
#[derive(Clone)]
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: String,
    user_id: String,
    title: Option<String>,
    created_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        Ok(Conversation {
            id: parse_uuid(&self.id, "conversation id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct ChatMessageRow {
    id: String,
    conversation_id: String,
    user_id: String,
    message: String,
    response: String,
    sentiment: String,
    file: Option<String>,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            user_id: row.try_get("user_id")?,
            message: row.try_get("message")?,
            response: row.try_get("response")?,
            sentiment: row.try_get("sentiment")?,
            file: row.try_get("file")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let sentiment: Sentiment = self
            .sentiment
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatMessage {
            id: parse_uuid(&self.id, "message id")?,
            conversation_id: parse_uuid(&self.conversation_id, "conversation_id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            message: self.message,
            response: self.response,
            sentiment,
            file: self.file,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn find_active_conversation(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| {
            ConversationRow::from_row(&row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_conversation()
        })
        .transpose()
    }

    async fn get_or_create_active_conversation(
        &self,
        user_id: &Uuid,
    ) -> Result<Conversation, RepositoryError> {
        if let Some(existing) = self.find_active_conversation(user_id).await? {
            return Ok(existing);
        }

        let conversation = Conversation {
            id: Uuid::now_v7(),
            user_id: *user_id,
            title: None,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO conversations (id, user_id, title, created_at) VALUES (?, ?, ?, ?)")
            .bind(conversation.id.to_string())
            .bind(conversation.user_id.to_string())
            .bind(&conversation.title)
            .bind(format_datetime(&conversation.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tracing::debug!(user_id = %user_id, conversation_id = %conversation.id, "conversation created");
        Ok(conversation)
    }

    async fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(conversation_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conversation_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn list_conversations(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in &rows {
            let conversation_row = ConversationRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            conversations.push(conversation_row.into_conversation()?);
        }

        Ok(conversations)
    }

    async fn append_message(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        message: NewMessage,
    ) -> Result<ChatMessage, RepositoryError> {
        let stored = ChatMessage {
            id: Uuid::now_v7(),
            conversation_id: *conversation_id,
            user_id: *user_id,
            message: message.message,
            response: message.response,
            sentiment: message.sentiment,
            file: message.file,
            created_at: Utc::now(),
        };

        // Ownership is re-checked in the same statement: the row is only
        // inserted if the conversation exists and belongs to `user_id`.
        let result = sqlx::query(
            r#"INSERT INTO chat_messages (id, conversation_id, user_id, message, response, sentiment, file, created_at)
               SELECT ?, ?, ?, ?, ?, ?, ?, ?
               WHERE EXISTS (SELECT 1 FROM conversations WHERE id = ? AND user_id = ?)"#,
        )
        .bind(stored.id.to_string())
        .bind(stored.conversation_id.to_string())
        .bind(stored.user_id.to_string())
        .bind(&stored.message)
        .bind(&stored.response)
        .bind(stored.sentiment.as_str())
        .bind(&stored.file)
        .bind(format_datetime(&stored.created_at))
        .bind(conversation_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(stored)
    }

    async fn list_messages(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages WHERE conversation_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                ChatMessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }

    async fn count_messages(&self, conversation_id: &Uuid) -> Result<u32, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_messages WHERE conversation_id = ?")
            .bind(conversation_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u32)
    }
}
