//! Help command handler

use teloxide::{Bot, types::{Message, ParseMode}, prelude::*};
use crate::utils::errors::Result;
use crate::i18n::I18n;

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message, i18n: I18n) -> Result<()> {
    let lang = i18n.detect_user_language(
        msg.from.as_ref().and_then(|u| u.language_code.as_deref()),
    );

    bot.send_message(msg.chat.id, i18n.t("help.text", &lang, None))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}
