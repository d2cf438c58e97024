//! Error handling for ProvisionBot
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for ProvisionBot application
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Dealer {dealer_id} has no account creation limit left")]
    QuotaExhausted { dealer_id: i64 },

    #[error("Username already taken: {username}")]
    UsernameTaken { username: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Field validation failures for a user being provisioned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid username: {0}")]
    Username(String),

    #[error("invalid password: {0}")]
    Password(String),

    #[error("invalid connection limit: {0}")]
    ConnectionLimit(String),

    #[error("invalid expiration: {0}")]
    Expiration(String),
}

/// Result type alias for ProvisionBot operations
pub type Result<T> = std::result::Result<T, BotError>;

impl BotError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            BotError::Database(_) => false,
            BotError::Migration(_) => false,
            BotError::Telegram(_) => true,
            BotError::Validation(_) => false,
            BotError::Config(_) => false,
            BotError::PermissionDenied(_) => false,
            BotError::QuotaExhausted { .. } => false,
            BotError::UsernameTaken { .. } => false,
            BotError::InvalidStateTransition { .. } => false,
            BotError::Redis(_) => true,
            BotError::Serialization(_) => false,
            BotError::Io(_) => true,
            BotError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BotError::Database(_) => ErrorSeverity::Critical,
            BotError::Migration(_) => ErrorSeverity::Critical,
            BotError::Config(_) => ErrorSeverity::Critical,
            BotError::PermissionDenied(_) => ErrorSeverity::Warning,
            BotError::QuotaExhausted { .. } => ErrorSeverity::Warning,
            BotError::UsernameTaken { .. } => ErrorSeverity::Info,
            BotError::Validation(_) => ErrorSeverity::Info,
            BotError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
