//! Bot handlers module
//! 
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for conversation replies

pub mod commands;
pub mod callbacks;
pub mod messages;
pub mod keyboards;

// Re-export commonly used handler functions
pub use commands::{Command, handle_command};
pub use callbacks::handle_callback_query;
pub use messages::handle_message;

use teloxide::{prelude::*, types::ChatId};
use crate::i18n::I18n;
use crate::utils::errors::Result;

/// Tell a chat that its update could not be handled
pub async fn report_failure(
    bot: &Bot,
    chat_id: ChatId,
    i18n: &I18n,
    language_code: Option<&str>,
) -> Result<()> {
    let lang = i18n.detect_user_language(language_code);
    bot.send_message(chat_id, i18n.t("errors.generic", &lang, None))
        .await?;
    Ok(())
}
