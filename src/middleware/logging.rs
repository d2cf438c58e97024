//! Logging middleware
//! 
//! This module provides logging middleware for tracking bot interactions
//! before they reach the handlers.

use teloxide::types::{Message, Update, UpdateKind};
use tracing::{info, debug, error, instrument};

/// Logging middleware for bot interactions
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    log_user_interactions: bool,
    log_errors: bool,
}

impl LoggingMiddleware {
    /// Create a new LoggingMiddleware instance
    pub fn new(log_user_interactions: bool, log_errors: bool) -> Self {
        Self {
            log_user_interactions,
            log_errors,
        }
    }

    /// Log incoming update
    #[instrument(skip(self, update), fields(update_id = update.id.0))]
    pub fn log_update(&self, update: &Update) {
        if !self.log_user_interactions {
            return;
        }

        match update.kind {
            UpdateKind::Message(ref message) => {
                self.log_message(message);
            }
            UpdateKind::CallbackQuery(ref callback) => {
                info!(
                    user_id = callback.from.id.0,
                    callback_data = callback.data.as_deref().unwrap_or("none"),
                    "Callback query received"
                );
            }
            _ => {
                debug!(update_type = ?std::mem::discriminant(&update.kind), "Other update type received");
            }
        }
    }

    /// Log message details. Only the length of the text is recorded since
    /// conversation replies carry passwords.
    pub fn log_message(&self, message: &Message) {
        if !self.log_user_interactions {
            return;
        }

        let (command, text_len) = message_summary(message.text().unwrap_or_default());

        info!(
            user_id = message.from.as_ref().map(|u| u.id.0),
            chat_id = message.chat.id.0,
            message_id = message.id.0,
            command = command,
            text_len = text_len,
            "Message received"
        );
    }

    /// Log error with context
    pub fn log_error(&self, error: &dyn std::error::Error, context: &str, user_id: Option<i64>) {
        if !self.log_errors {
            return;
        }

        error!(
            error = %error,
            context = context,
            user_id = user_id,
            "Error occurred"
        );
    }
}

/// Command name (without arguments) and byte length of a message text
fn message_summary(text: &str) -> (Option<&str>, usize) {
    let command = text
        .starts_with('/')
        .then(|| text.split_whitespace().next())
        .flatten();
    (command, text.len())
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new(true, true)
    }
}
