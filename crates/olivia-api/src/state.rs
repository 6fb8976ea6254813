//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the CLI screens.
//! Services are generic over repository/hasher/client traits; AppState pins
//! them to the infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use olivia_core::chat::session::SessionSettings;
use olivia_core::identity::profile::ProfileService;
use olivia_core::identity::service::AccountService;
use olivia_infra::config::{load_app_config, resolve_api_key};
use olivia_infra::crypto::password::Argon2CredentialHasher;
use olivia_infra::filesystem::{database_url, resolve_data_dir};
use olivia_infra::llm::openai::OpenAiCompletionClient;
use olivia_infra::sqlite::account::SqliteAccountRepository;
use olivia_infra::sqlite::pool::DatabasePool;
use olivia_infra::sqlite::profile::SqliteProfileRepository;
use olivia_infra::sqlite::turn::SqliteTurnStore;
use olivia_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAccountService = AccountService<
    SqliteAccountRepository,
    SqliteProfileRepository,
    Argon2CredentialHasher,
    SqliteTurnStore,
>;

pub type ConcreteProfileService = ProfileService<SqliteProfileRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<ConcreteAccountService>,
    pub profiles: Arc<ConcreteProfileService>,
    pub turns: SqliteTurnStore,
    pub client: Arc<OpenAiCompletionClient>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: resolve the API key, load config,
    /// connect to the DB, wire services.
    ///
    /// A missing API key fails here, before any screen is shown.
    pub async fn init() -> anyhow::Result<Self> {
        let api_key = resolve_api_key()?;

        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_app_config(&data_dir).await;
        let client = OpenAiCompletionClient::new(api_key, &config.completion)?;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let turns = SqliteTurnStore::new(db_pool.clone());

        let accounts = AccountService::new(
            SqliteAccountRepository::new(db_pool.clone()),
            SqliteProfileRepository::new(db_pool.clone()),
            Argon2CredentialHasher::new(),
            turns.clone(),
        );
        let profiles = ProfileService::new(SqliteProfileRepository::new(db_pool.clone()));

        tracing::debug!(data_dir = %data_dir.display(), model = %client.model(), "Application state ready");

        Ok(Self {
            accounts: Arc::new(accounts),
            profiles: Arc::new(profiles),
            turns,
            client: Arc::new(client),
            config,
            data_dir,
            db_pool,
        })
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            system_prompt: self.config.system_prompt().to_string(),
            history_window: self.config.chat.history_window,
            welcome_message: self.config.chat.welcome_message.clone(),
        }
    }

    pub fn assistant_name(&self) -> &str {
        &self.config.chat.assistant_name
    }
}
