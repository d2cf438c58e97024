//! Message handlers module
//!
//! Routes plain text messages into an open conversation

use teloxide::{Bot, types::Message};
use tracing::debug;
use crate::utils::errors::{BotError, Result};
use crate::services::ServiceFactory;
use crate::state::{ConversationContext, ScenarioManager, StateStorage, CREATE_USER_SCENARIO};
use crate::i18n::I18n;
use crate::handlers::commands::create_user;

/// Handle incoming text messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BotError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    if msg.text().is_none() {
        debug!(user_id = user_id, chat_id = ?chat_id, "Ignoring non-text message");
        return Ok(());
    }

    match state_storage.load_context(user_id).await? {
        Some(context) if belongs_to_conversation(&context, chat_id.0) => {
            create_user::handle_conversation_step(
                bot, msg, context, services, scenario_manager, state_storage, i18n,
            )
            .await
        }
        Some(_) => {
            debug!(user_id = user_id, chat_id = ?chat_id, "Message outside the conversation chat");
            Ok(())
        }
        None => {
            debug!(user_id = user_id, chat_id = ?chat_id, "No open conversation, ignoring message");
            Ok(())
        }
    }
}

/// Only replies in the chat the conversation was started in count
fn belongs_to_conversation(context: &ConversationContext, chat_id: i64) -> bool {
    context.is_in_scenario(CREATE_USER_SCENARIO) && context.chat_id == Some(chat_id)
}
