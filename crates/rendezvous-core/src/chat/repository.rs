//! ChatRepository trait definition.
//!
//! Provides conversation lifecycle and the append-only message log.
//! Follows the same RPITIT pattern as `UserRepository`.

use rendezvous_types::chat::{ChatMessage, Conversation, NewMessage};
use rendezvous_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for conversation and message persistence.
///
/// Implementations live in rendezvous-infra (e.g., `SqliteChatRepository`).
pub trait ChatRepository: Send + Sync {
    /// Return the user's active (oldest) conversation without creating one.
    fn find_active_conversation(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Return the user's active (oldest) conversation, creating one if the
    /// user has none.
    ///
    /// Not atomic: two concurrent first calls for the same user may each
    /// create a conversation. Later calls consistently return the oldest.
    fn get_or_create_active_conversation(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by its unique ID.
    fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List a user's conversations, ordered by created_at DESC.
    fn list_conversations(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Append a message to a conversation owned by `user_id`.
    ///
    /// The id and created_at are assigned here. Returns `NotFound` if the
    /// conversation does not exist or belongs to a different user.
    fn append_message(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
        message: NewMessage,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Get all messages of a conversation, ordered by created_at ASC.
    fn list_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Number of messages in a conversation.
    fn count_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;
}
