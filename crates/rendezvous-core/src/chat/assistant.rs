//! Assistant gateway: turns a conversation's history plus a new message into
//! a single chat-completion call.

use std::time::Duration;

use rendezvous_types::chat::ChatMessage;
use rendezvous_types::error::ChatError;
use rendezvous_types::llm::{CompletionRequest, Message};
use tracing::{debug, warn};

use crate::llm::box_provider::BoxLlmProvider;

/// Wraps the configured completion backend with the fixed request
/// parameters and a hard timeout.
pub struct AssistantGateway {
    provider: BoxLlmProvider,
    model: String,
    temperature: f64,
    max_tokens: Option<u32>,
    system_prompt: String,
    timeout: Duration,
}

impl AssistantGateway {
    pub fn new(
        provider: BoxLlmProvider,
        model: impl Into<String>,
        temperature: f64,
        system_prompt: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            system_prompt: system_prompt.into(),
            timeout,
        }
    }

    /// Cap the reply length.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the transcript sent to the backend.
    ///
    /// System turn first, then one user/assistant pair per stored message in
    /// the order given, then the new user turn.
    pub fn build_transcript(&self, history: &[ChatMessage], text: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() * 2 + 2);
        messages.push(Message::system(self.system_prompt.clone()));
        for entry in history {
            messages.push(Message::user(entry.message.clone()));
            messages.push(Message::assistant(entry.response.clone()));
        }
        messages.push(Message::user(text));
        messages
    }

    /// Ask the assistant for a reply to `text` given `history`.
    ///
    /// Any backend failure, timeout, or blank reply is reported as
    /// [`ChatError::AssistantUnavailable`].
    pub async fn generate_reply(
        &self,
        history: &[ChatMessage],
        text: &str,
    ) -> Result<String, ChatError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: self.build_transcript(history, text),
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        };

        let result = tokio::time::timeout(self.timeout, self.provider.complete(&request)).await;

        let response = match result {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(provider = self.provider.name(), error = %e, "assistant call failed");
                return Err(ChatError::AssistantUnavailable(e.to_string()));
            }
            Err(_) => {
                warn!(
                    provider = self.provider.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "assistant call timed out"
                );
                return Err(ChatError::AssistantUnavailable(format!(
                    "request timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        let reply = response.content.trim();
        if reply.is_empty() {
            warn!(provider = self.provider.name(), "assistant returned an empty reply");
            return Err(ChatError::AssistantUnavailable(
                "assistant returned an empty reply".to_string(),
            ));
        }

        debug!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "assistant reply received"
        );

        Ok(reply.to_string())
    }
}
