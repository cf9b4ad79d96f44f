//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `rendezvous-core`, plus a factory ([`create_provider`])
//! that builds it from the `[assistant]` configuration section.
//!
//! [`LlmProvider`]: rendezvous_core::llm::provider::LlmProvider

pub mod openai_compat;

use rendezvous_core::llm::box_provider::BoxLlmProvider;
use rendezvous_core::llm::provider::LlmProvider;
use rendezvous_types::config::AssistantConfig;
use rendezvous_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from the assistant configuration.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] if no API key was injected.
pub fn create_provider(config: &AssistantConfig) -> Result<BoxLlmProvider, LlmError> {
    let api_key = config
        .api_key
        .clone()
        .ok_or(LlmError::AuthenticationFailed)?;
    let provider =
        OpenAiCompatibleProvider::new(openai_compat::config::from_assistant_config(config, api_key));
    Ok(BoxLlmProvider::new(provider))
}

/// Like [`create_provider`], but falls back to [`UnconfiguredProvider`] when
/// no API key is available, so the server still starts and chat requests
/// fail with an upstream error instead.
pub fn create_provider_or_unconfigured(config: &AssistantConfig) -> BoxLlmProvider {
    match create_provider(config) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::warn!(error = %e, "assistant provider unavailable, chat replies will fail");
            BoxLlmProvider::new(UnconfiguredProvider)
        }
    }
}

/// Placeholder provider used when no API key is configured.
pub struct UnconfiguredProvider;

impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::AuthenticationFailed)
    }
}
