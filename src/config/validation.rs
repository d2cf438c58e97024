//! Configuration validation module
//! 
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{BotError, Result};
use super::{Settings, StateBackendKind};

/// Largest accepted `provisioning.max_expiration_days` (about a century)
pub const MAX_EXPIRATION_DAYS_CEILING: i64 = 36500;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_state_config(&settings.state)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;
    validate_provisioning_config(&settings.provisioning)?;
    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(BotError::Config(
            "Bot token is required".to_string()
        ));
    }
    
    if config.admin_ids.is_empty() {
        return Err(BotError::Config(
            "At least one admin ID must be configured".to_string()
        ));
    }
    
    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(BotError::Config(
            "Database URL is required".to_string()
        ));
    }
    
    if config.max_connections == 0 {
        return Err(BotError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }
    
    if config.min_connections > config.max_connections {
        return Err(BotError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }
    
    Ok(())
}

/// Validate conversation state configuration
fn validate_state_config(config: &super::StateConfig) -> Result<()> {
    if config.backend == StateBackendKind::Redis && config.redis_url.is_empty() {
        return Err(BotError::Config(
            "Redis URL is required for the redis state backend".to_string()
        ));
    }

    if config.ttl_seconds == 0 {
        return Err(BotError::Config(
            "State TTL must be greater than 0".to_string()
        ));
    }
    
    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(BotError::Config(
            "Default language is required".to_string()
        ));
    }
    
    if config.supported_languages.is_empty() {
        return Err(BotError::Config(
            "At least one supported language is required".to_string()
        ));
    }
    
    if !config.supported_languages.contains(&config.default_language) {
        return Err(BotError::Config(
            "Default language must be in supported languages list".to_string()
        ));
    }
    
    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(BotError::Config(
            "Log level is required".to_string()
        ));
    }
    
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(BotError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }
    
    Ok(())
}

/// Validate provisioning limits
fn validate_provisioning_config(config: &super::ProvisioningConfig) -> Result<()> {
    if config.max_connection_limit < 1 {
        return Err(BotError::Config(
            "Max connection limit must be greater than 0".to_string()
        ));
    }

    if config.max_expiration_days < 1 {
        return Err(BotError::Config(
            "Max expiration days must be greater than 0".to_string()
        ));
    }

    if config.max_expiration_days > MAX_EXPIRATION_DAYS_CEILING {
        return Err(BotError::Config(format!(
            "Max expiration days must not exceed {}",
            MAX_EXPIRATION_DAYS_CEILING
        )));
    }

    if config.conversation_timeout_seconds == 0 {
        return Err(BotError::Config(
            "Conversation timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}
