//! Configuration for the OpenAI-compatible provider.

use rendezvous_types::config::AssistantConfig;
use secrecy::SecretString;

/// Default OpenAI chat completions endpoint.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// Model identifier (e.g., "gpt-3.5-turbo").
    pub model: String,
}

/// Build a provider configuration from the `[assistant]` config section.
///
/// A base URL other than the OpenAI default names the provider by its host
/// so logs distinguish self-hosted or proxy endpoints.
pub fn from_assistant_config(config: &AssistantConfig, api_key: SecretString) -> OpenAiCompatConfig {
    let base_url = config.base_url.trim_end_matches('/').to_string();
    let provider_name = if base_url == OPENAI_BASE_URL {
        "openai".to_string()
    } else {
        host_of(&base_url).unwrap_or("openai-compatible").to_string()
    };

    OpenAiCompatConfig {
        provider_name,
        base_url,
        api_key,
        model: config.model.clone(),
    }
}

fn host_of(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    rest.split(['/', ':']).next().filter(|h| !h.is_empty())
}
