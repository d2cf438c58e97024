//! Test context for unified test setup
//!
//! Wires the services to in-memory stores, conversation state to the
//! in-memory backend and the bot to a mock Telegram API.

use std::sync::Arc;

use ProvisionBot::config::Settings;
use ProvisionBot::database::DatabaseService;
use ProvisionBot::i18n::I18n;
use ProvisionBot::services::ServiceFactory;
use ProvisionBot::state::{ScenarioManager, StateStorage};
use ProvisionBot::utils::UserValidator;
use teloxide::Bot;

use super::memory_stores::{MemoryAccountStore, MemoryDealerStore, MemoryUserStore};
use super::telegram_mock::{test_admin_id, TelegramMockServer};
use ProvisionBot::database::DealerStore;
use ProvisionBot::models::UpsertDealerRequest;

/// Unified test context that manages all test components
pub struct TestContext {
    pub telegram_mock: TelegramMockServer,
    pub bot: Bot,
    pub settings: Settings,
    pub users: Arc<MemoryUserStore>,
    pub dealers: Arc<MemoryDealerStore>,
    pub accounts: Arc<MemoryAccountStore>,
    pub services: ServiceFactory,
    pub scenario_manager: ScenarioManager,
    pub state_storage: StateStorage,
    pub i18n: I18n,
}

impl TestContext {
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();

        let settings = test_settings();

        let users = Arc::new(MemoryUserStore::default());
        let dealers = Arc::new(MemoryDealerStore::default());
        let accounts = Arc::new(MemoryAccountStore::default());
        let database = DatabaseService::from_stores(users.clone(), dealers.clone(), accounts.clone());

        let services = ServiceFactory::new(&settings, &database);
        let scenario_manager = ScenarioManager::new(
            UserValidator::from_config(&settings.provisioning),
            settings.provisioning.conversation_timeout_seconds,
        );
        let i18n = I18n::load(&settings.i18n).await.expect("translations load");

        let telegram_mock = TelegramMockServer::new().await;
        let bot = telegram_mock.bot();

        Self {
            telegram_mock,
            bot,
            settings,
            users,
            dealers,
            accounts,
            services,
            scenario_manager,
            state_storage: StateStorage::in_memory(),
            i18n,
        }
    }

    /// Register `dealer_id` with `limit` accounts left
    pub async fn add_dealer(&self, dealer_id: i64, limit: i32) {
        self.dealers
            .upsert(UpsertDealerRequest {
                id: dealer_id,
                account_creation_limit: limit,
            })
            .await
            .expect("dealer upsert");
    }

    /// Portuguese translation of `key`
    pub fn t(&self, key: &str) -> String {
        self.i18n.t(key, "pt", None)
    }
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.bot.token = "12345:test_token".to_string();
    settings.bot.admin_ids = vec![test_admin_id()];
    settings.i18n.translations_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/translations").to_string();
    settings
}
