//! Application configuration loader for Rendezvous.
//!
//! Reads `config.toml` from the data directory (`~/.rendezvous/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed. The assistant API key is taken from the
//! environment, never from the file.

use std::path::{Path, PathBuf};

use rendezvous_types::config::AppConfig;
use secrecy::SecretString;

/// Environment variable holding the assistant API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
///
/// In every case the API key is then filled from `OPENAI_API_KEY` if set.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let mut config = read_config_file(data_dir).await;
    config.assistant.api_key = api_key_from(std::env::var(API_KEY_ENV).ok());
    config
}

async fn read_config_file(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

fn api_key_from(value: Option<String>) -> Option<SecretString> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

/// Resolve the attachment content root.
///
/// `[storage] content_dir` wins when set (relative paths are taken from the
/// data directory); otherwise `{data_dir}/media`.
pub fn resolve_content_root(config: &AppConfig, data_dir: &Path) -> PathBuf {
    match config.storage.content_dir.as_deref().map(str::trim) {
        Some(dir) if !dir.is_empty() => {
            let path = PathBuf::from(dir);
            if path.is_absolute() {
                path
            } else {
                data_dir.join(path)
            }
        }
        _ => data_dir.join("media"),
    }
}
