//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/storage/hasher traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rendezvous_core::chat::assistant::AssistantGateway;
use rendezvous_core::chat::sentiment::SentimentClassifier;
use rendezvous_core::chat::service::ChatService;
use rendezvous_core::llm::box_provider::BoxLlmProvider;
use rendezvous_core::service::user::UserService;
use rendezvous_infra::config::{load_app_config, resolve_content_root};
use rendezvous_infra::crypto::credentials::Argon2CredentialHasher;
use rendezvous_infra::filesystem::resolve_data_dir;
use rendezvous_infra::llm::create_provider_or_unconfigured;
use rendezvous_infra::sentiment::VaderPolarityScorer;
use rendezvous_infra::sqlite::chat::SqliteChatRepository;
use rendezvous_infra::sqlite::pool::{database_url, DatabasePool};
use rendezvous_infra::sqlite::user::SqliteUserRepository;
use rendezvous_infra::storage::filesystem::LocalAttachmentStore;
use rendezvous_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository, LocalAttachmentStore>;

pub type ConcreteUserService = UserService<SqliteUserRepository, Argon2CredentialHasher>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub user_service: Arc<ConcreteUserService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_app_config(&data_dir).await;
        let provider = create_provider_or_unconfigured(&config.assistant);

        Self::build(data_dir, config, provider).await
    }

    /// Wire the state from explicit parts.
    ///
    /// The assistant provider is injected so callers can substitute a fake.
    pub async fn build(
        data_dir: PathBuf,
        config: AppConfig,
        provider: BoxLlmProvider,
    ) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let content_root = resolve_content_root(&config, &data_dir);
        tracing::debug!(
            data_dir = %data_dir.display(),
            content_root = %content_root.display(),
            provider = provider.name(),
            "wiring application state"
        );

        let assistant = &config.assistant;
        let gateway = AssistantGateway::new(
            provider,
            assistant.model.clone(),
            assistant.temperature,
            assistant.system_prompt.clone(),
            Duration::from_secs(assistant.timeout_secs),
        )
        .with_max_tokens(assistant.max_tokens);

        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            LocalAttachmentStore::new(content_root),
            gateway,
            SentimentClassifier::new(VaderPolarityScorer::new()),
        );

        let user_service = UserService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2CredentialHasher::new(),
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            user_service: Arc::new(user_service),
            config: Arc::new(config),
        })
    }
}
