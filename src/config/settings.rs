//! Application settings management
//! 
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub state: StateConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
    pub provisioning: ProvisioningConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    pub admin_ids: Vec<i64>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Where conversation state lives between messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StateBackendKind {
    Redis,
    Memory,
}

/// Conversation state storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StateConfig {
    pub backend: StateBackendKind,
    pub redis_url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub translations_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    pub file_name: String,
}

/// Limits applied to provisioned users and the create-user conversation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvisioningConfig {
    pub max_connection_limit: i32,
    pub max_expiration_days: i64,
    pub conversation_timeout_seconds: u64,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// `PROVISIONBOT__BOT__TOKEN` overrides `bot.token`, and so on.
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("PROVISIONBOT")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("bot.admin_ids")
                    .with_list_parse_key("i18n.supported_languages")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::BotError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig::default(),
            database: DatabaseConfig::default(),
            state: StateConfig::default(),
            i18n: I18nConfig::default(),
            logging: LoggingConfig::default(),
            provisioning: ProvisioningConfig::default(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            admin_ids: vec![],
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/provisionbot".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: StateBackendKind::Redis,
            redis_url: "redis://localhost:6379".to_string(),
            prefix: "provisionbot:".to_string(),
            ttl_seconds: 3600,
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_language: "pt".to_string(),
            supported_languages: vec!["pt".to_string(), "en".to_string()],
            translations_dir: "translations".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: "logs".to_string(),
            file_name: "provisionbot.log".to_string(),
        }
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            max_connection_limit: 100,
            max_expiration_days: 3650,
            conversation_timeout_seconds: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.i18n.default_language, "pt");
        assert_eq!(settings.state.backend, StateBackendKind::Redis);
        assert_eq!(settings.provisioning.max_connection_limit, 100);
        assert_eq!(settings.provisioning.conversation_timeout_seconds, 600);
    }

    #[test]
    fn test_backend_deserialization() {
        let kind: StateBackendKind = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(kind, StateBackendKind::Memory);
        assert!(serde_json::from_str::<StateBackendKind>("\"etcd\"").is_err());
    }
}
