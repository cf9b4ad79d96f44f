//! Chat service orchestrating one inbound message end to end.
//!
//! ChatService coordinates the ChatRepository, AttachmentStore, sentiment
//! classifier and assistant gateway: validate, classify, resolve the active
//! conversation, ask the assistant, store the attachment, append the record.

use rendezvous_types::chat::{Attachment, ChatMessage, Conversation, NewMessage};
use rendezvous_types::error::{ChatError, RepositoryError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::assistant::AssistantGateway;
use crate::chat::repository::ChatRepository;
use crate::chat::sentiment::SentimentClassifier;
use crate::storage::attachment::{AttachmentStore, sanitize_file_name};

/// Orchestrates chat message handling and history queries.
///
/// Generic over `ChatRepository` and `AttachmentStore` to maintain clean
/// architecture (rendezvous-core never depends on rendezvous-infra).
pub struct ChatService<C: ChatRepository, A: AttachmentStore> {
    chat_repo: C,
    attachments: A,
    assistant: AssistantGateway,
    classifier: SentimentClassifier,
}

impl<C: ChatRepository, A: AttachmentStore> ChatService<C, A> {
    pub fn new(
        chat_repo: C,
        attachments: A,
        assistant: AssistantGateway,
        classifier: SentimentClassifier,
    ) -> Self {
        Self {
            chat_repo,
            attachments,
            assistant,
            classifier,
        }
    }

    /// Handle one inbound chat message for `user_id`.
    ///
    /// At least one of `text` (non-blank) or `attachment` (non-blank file
    /// name) must be present. The assistant is called before anything is
    /// written, so a failed call leaves no conversation rows, message rows,
    /// or files behind for this request.
    ///
    /// The text is stored and sent exactly as received; only the blank
    /// check and sentiment use its trimmed form.
    ///
    /// 1. Validate input and sanitize the attachment name
    /// 2. Classify the sentiment of the text
    /// 3. Load the active conversation's history, if any
    /// 4. Ask the assistant for a reply
    /// 5. Resolve (or create) the conversation, store the attachment, then
    ///    append the message record
    pub async fn handle_message(
        &self,
        user_id: Uuid,
        text: Option<String>,
        attachment: Option<Attachment>,
    ) -> Result<ChatMessage, ChatError> {
        let text = text.filter(|t| !t.trim().is_empty());
        let attachment = attachment.filter(|a| !a.file_name.trim().is_empty());

        if text.is_none() && attachment.is_none() {
            return Err(ChatError::Validation(
                "either a message or a file is required".to_string(),
            ));
        }

        let attachment = match attachment {
            Some(a) => Some(Attachment {
                file_name: sanitize_file_name(&a.file_name)?,
                bytes: a.bytes,
            }),
            None => None,
        };

        let text = text.unwrap_or_default();
        let sentiment = self.classifier.classify(text.trim());

        let active = self.chat_repo.find_active_conversation(&user_id).await?;
        let history = match &active {
            Some(c) => self.chat_repo.list_messages(&c.id).await?,
            None => Vec::new(),
        };

        let response = self.assistant.generate_reply(&history, &text).await?;

        let conversation = match active {
            Some(c) => c,
            None => {
                self.chat_repo
                    .get_or_create_active_conversation(&user_id)
                    .await?
            }
        };

        let file = match &attachment {
            Some(a) => Some(self.attachments.store(&a.file_name, &a.bytes).await?),
            None => None,
        };

        let new_message = NewMessage {
            message: text,
            response,
            sentiment,
            file: file.clone(),
        };

        let stored = match self
            .chat_repo
            .append_message(&conversation.id, &user_id, new_message)
            .await
        {
            Ok(stored) => stored,
            Err(e) => {
                if let Some(path) = &file {
                    if let Err(cleanup) = self.attachments.remove(path).await {
                        warn!(path = %path, error = %cleanup, "failed to remove orphaned attachment");
                    }
                }
                return Err(e.into());
            }
        };

        info!(
            user_id = %user_id,
            conversation_id = %conversation.id,
            message_id = %stored.id,
            sentiment = %stored.sentiment,
            has_file = stored.file.is_some(),
            "chat message handled"
        );

        Ok(stored)
    }

    /// List a user's conversations, most recent first.
    pub async fn list_conversations(&self, user_id: Uuid) -> Result<Vec<Conversation>, ChatError> {
        Ok(self.chat_repo.list_conversations(&user_id).await?)
    }

    /// List the messages of a conversation owned by `user_id`, oldest first.
    ///
    /// Returns `ConversationNotFound` when it does not exist and `Forbidden`
    /// when it belongs to someone else.
    pub async fn list_messages(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        match self.chat_repo.get_conversation(&conversation_id).await? {
            None => Err(ChatError::ConversationNotFound(conversation_id)),
            Some(c) if c.user_id != user_id => Err(ChatError::Forbidden(conversation_id)),
            Some(_) => Ok(self.chat_repo.list_messages(&conversation_id).await?),
        }
    }

    /// Number of messages stored in a conversation.
    pub async fn count_messages(&self, conversation_id: Uuid) -> Result<u32, ChatError> {
        self.chat_repo
            .count_messages(&conversation_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ChatError::ConversationNotFound(conversation_id),
                other => ChatError::Storage(other),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use chrono::{TimeDelta, Utc};
    use rendezvous_types::chat::Sentiment;
    use rendezvous_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

    use crate::chat::sentiment::PolarityScorer;
    use crate::llm::box_provider::BoxLlmProvider;
    use crate::llm::provider::LlmProvider;

    // --- In-memory fakes ---

    #[derive(Default)]
    struct MemoryStore {
        conversations: Vec<Conversation>,
        messages: Vec<ChatMessage>,
    }

    #[derive(Clone, Default)]
    struct MemoryChatRepo {
        inner: Arc<Mutex<MemoryStore>>,
        fail_append: Arc<AtomicBool>,
    }

    impl MemoryChatRepo {
        fn conversation_count(&self) -> usize {
            self.inner.lock().unwrap().conversations.len()
        }

        fn message_count(&self) -> usize {
            self.inner.lock().unwrap().messages.len()
        }

        fn insert_conversation(&self, user_id: Uuid) -> Conversation {
            let conversation = Conversation {
                id: Uuid::now_v7(),
                user_id,
                title: None,
                created_at: Utc::now(),
            };
            self.inner
                .lock()
                .unwrap()
                .conversations
                .push(conversation.clone());
            conversation
        }
    }

    impl ChatRepository for MemoryChatRepo {
        async fn find_active_conversation(
            &self,
            user_id: &Uuid,
        ) -> Result<Option<Conversation>, RepositoryError> {
            let store = self.inner.lock().unwrap();
            Ok(store
                .conversations
                .iter()
                .filter(|c| c.user_id == *user_id)
                .min_by_key(|c| c.created_at)
                .cloned())
        }

        async fn get_or_create_active_conversation(
            &self,
            user_id: &Uuid,
        ) -> Result<Conversation, RepositoryError> {
            let mut store = self.inner.lock().unwrap();
            if let Some(c) = store
                .conversations
                .iter()
                .filter(|c| c.user_id == *user_id)
                .min_by_key(|c| c.created_at)
            {
                return Ok(c.clone());
            }
            let conversation = Conversation {
                id: Uuid::now_v7(),
                user_id: *user_id,
                title: None,
                created_at: Utc::now(),
            };
            store.conversations.push(conversation.clone());
            Ok(conversation)
        }

        async fn get_conversation(
            &self,
            conversation_id: &Uuid,
        ) -> Result<Option<Conversation>, RepositoryError> {
            let store = self.inner.lock().unwrap();
            Ok(store
                .conversations
                .iter()
                .find(|c| c.id == *conversation_id)
                .cloned())
        }

        async fn list_conversations(
            &self,
            user_id: &Uuid,
        ) -> Result<Vec<Conversation>, RepositoryError> {
            let store = self.inner.lock().unwrap();
            let mut list: Vec<Conversation> = store
                .conversations
                .iter()
                .filter(|c| c.user_id == *user_id)
                .cloned()
                .collect();
            list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(list)
        }

        async fn append_message(
            &self,
            conversation_id: &Uuid,
            user_id: &Uuid,
            message: NewMessage,
        ) -> Result<ChatMessage, RepositoryError> {
            if self.fail_append.load(Ordering::SeqCst) {
                return Err(RepositoryError::Query("disk full".to_string()));
            }
            let mut store = self.inner.lock().unwrap();
            let owned = store
                .conversations
                .iter()
                .any(|c| c.id == *conversation_id && c.user_id == *user_id);
            if !owned {
                return Err(RepositoryError::NotFound);
            }
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
            store.messages.push(stored.clone());
            Ok(stored)
        }

        async fn list_messages(
            &self,
            conversation_id: &Uuid,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            let store = self.inner.lock().unwrap();
            Ok(store
                .messages
                .iter()
                .filter(|m| m.conversation_id == *conversation_id)
                .cloned()
                .collect())
        }

        async fn count_messages(&self, conversation_id: &Uuid) -> Result<u32, RepositoryError> {
            let store = self.inner.lock().unwrap();
            Ok(store
                .messages
                .iter()
                .filter(|m| m.conversation_id == *conversation_id)
                .count() as u32)
        }
    }

    #[derive(Clone, Default)]
    struct MemoryAttachments {
        files: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    }

    impl MemoryAttachments {
        fn paths(&self) -> Vec<String> {
            self.files
                .lock()
                .unwrap()
                .iter()
                .map(|(p, _)| p.clone())
                .collect()
        }
    }

    impl AttachmentStore for MemoryAttachments {
        async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, ChatError> {
            let path = format!("chat_files/{file_name}");
            self.files
                .lock()
                .unwrap()
                .push((path.clone(), bytes.to_vec()));
            Ok(path)
        }

        async fn remove(&self, path: &str) -> Result<(), ChatError> {
            self.files.lock().unwrap().retain(|(p, _)| p != path);
            Ok(())
        }
    }

    /// Replies with "reply #N" and records each request's user turns.
    #[derive(Clone, Default)]
    struct MockProvider {
        calls: Arc<AtomicUsize>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
        fail: Arc<AtomicBool>,
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.requests.lock().unwrap().push(request.clone());
            if self.fail.load(Ordering::SeqCst) {
                return Err(LlmError::Overloaded("try later".to_string()));
            }
            Ok(CompletionResponse {
                id: format!("resp-{n}"),
                content: format!("reply #{n}"),
                model: request.model.clone(),
                usage: Usage::default(),
            })
        }
    }

    /// Positive on "love", negative on "hate", neutral otherwise.
    struct KeywordScorer;

    impl PolarityScorer for KeywordScorer {
        fn polarity(&self, text: &str) -> f64 {
            if text.contains("love") {
                0.8
            } else if text.contains("hate") {
                -0.8
            } else {
                0.0
            }
        }
    }

    struct Harness {
        service: ChatService<MemoryChatRepo, MemoryAttachments>,
        repo: MemoryChatRepo,
        attachments: MemoryAttachments,
        provider: MockProvider,
    }

    fn harness() -> Harness {
        let repo = MemoryChatRepo::default();
        let attachments = MemoryAttachments::default();
        let provider = MockProvider::default();
        let gateway = AssistantGateway::new(
            BoxLlmProvider::new(provider.clone()),
            "gpt-test",
            0.9,
            "You are a helpful assistant.",
            Duration::from_secs(5),
        );
        let service = ChatService::new(
            repo.clone(),
            attachments.clone(),
            gateway,
            SentimentClassifier::new(KeywordScorer),
        );
        Harness {
            service,
            repo,
            attachments,
            provider,
        }
    }

    #[tokio::test]
    async fn test_first_message_creates_conversation() {
        let h = harness();
        let user = Uuid::now_v7();

        let stored = h
            .service
            .handle_message(user, Some("Hello".into()), None)
            .await
            .unwrap();

        assert_eq!(stored.message, "Hello");
        assert_eq!(stored.response, "reply #1");
        assert_eq!(stored.sentiment, Sentiment::Neutral);
        assert!(stored.file.is_none());
        assert_eq!(h.repo.conversation_count(), 1);
        assert_eq!(h.repo.message_count(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_reuses_conversation_and_sends_history() {
        let h = harness();
        let user = Uuid::now_v7();

        let first = h
            .service
            .handle_message(user, Some("I love this".into()), None)
            .await
            .unwrap();
        let second = h
            .service
            .handle_message(user, Some("I hate waiting".into()), None)
            .await
            .unwrap();

        assert_eq!(first.conversation_id, second.conversation_id);
        assert_eq!(first.sentiment, Sentiment::Positive);
        assert_eq!(second.sentiment, Sentiment::Negative);
        assert_eq!(h.repo.conversation_count(), 1);

        let requests = h.provider.requests.lock().unwrap();
        let contents: Vec<&str> = requests[1]
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(
            contents,
            vec![
                "You are a helpful assistant.",
                "I love this",
                "reply #1",
                "I hate waiting"
            ]
        );
    }

    #[tokio::test]
    async fn test_file_only_message() {
        let h = harness();
        let user = Uuid::now_v7();

        let stored = h
            .service
            .handle_message(
                user,
                None,
                Some(Attachment::new("uploads/report.pdf", b"%PDF".to_vec())),
            )
            .await
            .unwrap();

        assert_eq!(stored.message, "");
        assert_eq!(stored.sentiment, Sentiment::Neutral);
        assert_eq!(stored.file.as_deref(), Some("chat_files/report.pdf"));
        assert_eq!(h.attachments.paths(), vec!["chat_files/report.pdf"]);

        let requests = h.provider.requests.lock().unwrap();
        assert_eq!(requests[0].messages.last().unwrap().content, "");
    }

    #[tokio::test]
    async fn test_missing_input_is_rejected_without_side_effects() {
        let h = harness();
        let user = Uuid::now_v7();

        for (text, attachment) in [
            (None, None),
            (Some("   ".to_string()), None),
            (None, Some(Attachment::new("  ", b"x".to_vec()))),
        ] {
            let err = h
                .service
                .handle_message(user, text, attachment)
                .await
                .unwrap_err();
            assert!(matches!(err, ChatError::Validation(_)));
        }

        assert_eq!(h.provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.repo.conversation_count(), 0);
        assert_eq!(h.repo.message_count(), 0);
    }

    #[tokio::test]
    async fn test_assistant_failure_persists_nothing() {
        let h = harness();
        let user = Uuid::now_v7();
        h.provider.fail.store(true, Ordering::SeqCst);

        let err = h
            .service
            .handle_message(
                user,
                Some("Hello".into()),
                Some(Attachment::new("a.txt", b"abc".to_vec())),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::AssistantUnavailable(_)));
        assert_eq!(h.repo.conversation_count(), 0);
        assert_eq!(h.repo.message_count(), 0);
        assert!(h.attachments.paths().is_empty());
    }

    #[tokio::test]
    async fn test_assistant_failure_keeps_existing_history_intact() {
        let h = harness();
        let user = Uuid::now_v7();
        let first = h
            .service
            .handle_message(user, Some("Hello".into()), None)
            .await
            .unwrap();

        h.provider.fail.store(true, Ordering::SeqCst);
        let err = h
            .service
            .handle_message(user, Some("Still there?".into()), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::AssistantUnavailable(_)));
        assert_eq!(h.repo.conversation_count(), 1);
        assert_eq!(h.repo.message_count(), 1);
        let messages = h.service.list_messages(first.conversation_id, user).await.unwrap();
        assert_eq!(messages[0].id, first.id);
    }

    #[tokio::test]
    async fn test_text_is_stored_and_sent_verbatim() {
        let h = harness();
        let user = Uuid::now_v7();
        let text = "  indented code\n    block\n";

        let stored = h
            .service
            .handle_message(user, Some(text.to_string()), None)
            .await
            .unwrap();

        assert_eq!(stored.message, text);
        let requests = h.provider.requests.lock().unwrap();
        assert_eq!(requests[0].messages.last().unwrap().content, text);
    }

    #[tokio::test]
    async fn test_append_failure_removes_stored_file() {
        let h = harness();
        let user = Uuid::now_v7();
        h.repo.fail_append.store(true, Ordering::SeqCst);

        let err = h
            .service
            .handle_message(
                user,
                Some("Hello".into()),
                Some(Attachment::new("a.txt", b"abc".to_vec())),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Storage(_)));
        assert!(h.attachments.paths().is_empty());
    }

    #[tokio::test]
    async fn test_list_messages_enforces_ownership() {
        let h = harness();
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();

        let stored = h
            .service
            .handle_message(owner, Some("Hello".into()), None)
            .await
            .unwrap();

        let messages = h
            .service
            .list_messages(stored.conversation_id, owner)
            .await
            .unwrap();
        assert_eq!(messages.len(), 1);

        let err = h
            .service
            .list_messages(stored.conversation_id, stranger)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Forbidden(id) if id == stored.conversation_id));

        let missing = Uuid::now_v7();
        let err = h.service.list_messages(missing, owner).await.unwrap_err();
        assert!(matches!(err, ChatError::ConversationNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn test_list_conversations_is_scoped_and_newest_first() {
        let h = harness();
        let user = Uuid::now_v7();
        let other = Uuid::now_v7();

        let older = h.repo.insert_conversation(user);
        {
            let mut store = h.repo.inner.lock().unwrap();
            store.conversations[0].created_at = Utc::now() - TimeDelta::hours(1);
        }
        let newer = h.repo.insert_conversation(user);
        h.repo.insert_conversation(other);

        let list = h.service.list_conversations(user).await.unwrap();
        let ids: Vec<Uuid> = list.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        // New messages land in the oldest conversation.
        let stored = h
            .service
            .handle_message(user, Some("hi".into()), None)
            .await
            .unwrap();
        assert_eq!(stored.conversation_id, older.id);
    }
}
