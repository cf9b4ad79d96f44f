//! Application configuration types for Rendezvous.
//!
//! `AppConfig` represents the `config.toml` in the data directory. Every
//! field has a default, so an empty or missing file yields a working setup.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Settings for the external chat-completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Upper bound on a single assistant call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Instruction sent as the first (system) turn of every transcript.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Credential for the API. Never read from the file; injected at startup.
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f64 {
    0.9
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_tokens: None,
            system_prompt: default_system_prompt(),
            api_key: None,
        }
    }
}

/// Where uploaded attachments are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Content root for attachments. Relative paths resolve against the
    /// data directory; `None` means `{data_dir}/media`.
    #[serde(default)]
    pub content_dir: Option<String>,
}
