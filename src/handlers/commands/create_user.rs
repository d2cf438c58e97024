//! User creation handlers
//!
//! Two entry points create users: the `create_user` menu button starts a
//! four-step conversation (username, password, connection limit, days until
//! expiration), and `/create_user <username> <password> <limit> <days>`
//! does the same in one message. Both end in
//! [`ProvisioningService::provision`](crate::services::ProvisioningService::provision).

use teloxide::{
    Bot,
    prelude::*,
    types::{CallbackQuery, ChatId, ForceReply, Message, ParseMode, ReplyParameters},
    utils::html,
};
use tracing::{debug, info, warn};
use crate::handlers::keyboards::back_menu_keyboard;
use crate::i18n::{I18n, params};
use crate::middleware::{PermissionGuard, CREATE_USER_PERMISSIONS};
use crate::models::user::{NewUser, ProvisionedUser};
use crate::services::ServiceFactory;
use crate::state::{ConversationContext, ScenarioManager, StateStorage, CREATE_USER_SCENARIO};
use crate::state::scenarios::steps;
use crate::utils::errors::{BotError, Result};
use crate::utils::helpers::{format_expiration_date, is_ascii_number, split_args};
use crate::utils::logging::{log_step_rejected, log_user_action};

/// Fields echoed back to the operator, in collection order
const ECHOED_FIELDS: [&str; 3] = [steps::USERNAME, steps::PASSWORD, steps::CONNECTION_LIMIT];

/// Callback `create_user`: start the conversation
pub async fn handle_start_conversation(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let lang = i18n.detect_user_language(query.from.language_code.as_deref());

    let guard = PermissionGuard::require_any(&services.auth_service, CREATE_USER_PERMISSIONS);
    if guard.check_callback(&bot, &query, &i18n).await?.is_none() {
        return Ok(());
    }

    if services.dealer_service.is_quota_exhausted(user_id).await? {
        info!(user_id = user_id, "Dealer tried to create a user without quota");
        bot.answer_callback_query(query.id.clone())
            .text(i18n.t("create_user.quota_exhausted", &lang, None))
            .await?;
        return Ok(());
    }

    bot.answer_callback_query(query.id.clone()).await?;

    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    let mut context = ConversationContext::new(user_id).with_chat(chat_id.0);
    scenario_manager.start_scenario(&mut context, CREATE_USER_SCENARIO)?;
    state_storage.save_context(&context).await?;

    let step = scenario_manager.get_current_step(&context)?;
    bot.send_message(chat_id, i18n.t(&step.prompt_key, &lang, None))
        .parse_mode(ParseMode::Html)
        .reply_markup(ForceReply::new().selective())
        .await?;

    log_user_action(user_id, "create_user_started", None);
    Ok(())
}

/// Handle a reply belonging to an open create-user conversation
pub async fn handle_conversation_step(
    bot: Bot,
    msg: Message,
    mut context: ConversationContext,
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
    let lang = i18n.detect_user_language(user.language_code.as_deref());
    let input = msg.text().unwrap_or_default().to_string();

    let step = scenario_manager.get_current_step(&context)?.clone();
    debug!(user_id = user_id, step = %step.id, "Processing conversation step");

    if let Err(e) = scenario_manager.validate_input(&context, &input) {
        log_step_rejected(user_id, &step.id, &e.to_string());
        state_storage.delete_context(user_id).await?;
        bot.send_message(chat_id, i18n.t(&step.error_key, &lang, None))
            .parse_mode(ParseMode::Html)
            .reply_markup(back_menu_keyboard(&i18n, &lang))
            .await?;
        return Ok(());
    }

    let validator = services.provisioning_service.validator();
    match step.id.as_str() {
        steps::CONNECTION_LIMIT => context.set_data(&step.id, validator.check_connection_limit(&input)?)?,
        steps::EXPIRATION_DATE => context.set_data(&step.id, validator.check_expiration_days(&input)?)?,
        _ => context.set_data(&step.id, &input)?,
    }

    let Some(next_step) = step.next_steps.first() else {
        state_storage.delete_context(user_id).await?;
        return finish_conversation(&bot, &msg, &context, &services, &i18n, &lang).await;
    };

    scenario_manager.next_step(&mut context, next_step)?;
    state_storage.save_context(&context).await?;

    let next = scenario_manager.get_current_step(&context)?;
    let mut lines: Vec<String> = ECHOED_FIELDS
        .iter()
        .filter_map(|field| {
            context.data.get(*field).map(|value| {
                let shown = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
                i18n.t(
                    &format!("create_user.echo.{}", field),
                    &lang,
                    Some(&params(&[("value", html::escape(&shown))])),
                )
            })
        })
        .collect();
    lines.push(i18n.t(&next.prompt_key, &lang, None));

    bot.send_message(chat_id, lines.join("\n"))
        .parse_mode(ParseMode::Html)
        .reply_markup(ForceReply::new().selective())
        .await?;

    Ok(())
}

/// Last step accepted: provision the user from the collected fields
async fn finish_conversation(
    bot: &Bot,
    msg: &Message,
    context: &ConversationContext,
    services: &ServiceFactory,
    i18n: &I18n,
    lang: &str,
) -> Result<()> {
    context.validate_data(&[
        steps::USERNAME,
        steps::PASSWORD,
        steps::CONNECTION_LIMIT,
        steps::EXPIRATION_DATE,
    ])?;

    let username = context.get_string(steps::USERNAME).unwrap_or_default();
    let password = context.get_string(steps::PASSWORD).unwrap_or_default();
    let limit = context.get_data::<i32>(steps::CONNECTION_LIMIT)?.unwrap_or_default();
    let days = context.get_i64(steps::EXPIRATION_DATE).unwrap_or_default();

    let new_user = match services
        .provisioning_service
        .build_user(&username, &password, limit, days)
    {
        Ok(new_user) => new_user,
        Err(e) => {
            log_step_rejected(context.user_id, steps::EXPIRATION_DATE, &e.to_string());
            return reply_with_back_menu(bot, msg, i18n.t("create_user.failed", lang, None), i18n, lang).await;
        }
    };

    provision_and_reply(bot, msg, context.user_id, new_user, services, i18n, lang).await
}

/// Handle `/create_user <username> <password> <limit> <days>`
pub async fn handle_create_user_command(
    bot: Bot,
    msg: Message,
    args: String,
    services: ServiceFactory,
    i18n: I18n,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BotError::InvalidInput("No user in message".to_string())
    })?;
    let user_id = user.id.0 as i64;
    let lang = i18n.detect_user_language(user.language_code.as_deref());

    let guard = PermissionGuard::require_any(&services.auth_service, CREATE_USER_PERMISSIONS);
    if guard.check_message(&bot, &msg, &i18n).await?.is_none() {
        return Ok(());
    }

    if services.dealer_service.is_quota_exhausted(user_id).await? {
        bot.send_message(msg.chat.id, i18n.t("create_user.quota_exhausted", &lang, None))
            .await?;
        return Ok(());
    }

    let [username, password, limit, days] = match split_args(&args)[..] {
        [a, b, c, d] => [a, b, c, d],
        _ => {
            return reply_with_back_menu(&bot, &msg, i18n.t("create_user.usage", &lang, None), &i18n, &lang).await;
        }
    };

    let Some(limit) = parse_number(limit) else {
        return reply_with_back_menu(&bot, &msg, i18n.t("create_user.limit_not_number", &lang, None), &i18n, &lang).await;
    };
    let Some(days) = parse_number(days) else {
        return reply_with_back_menu(&bot, &msg, i18n.t("create_user.expiration_not_number", &lang, None), &i18n, &lang).await;
    };

    if limit < 1 {
        return reply_with_back_menu(&bot, &msg, i18n.t("create_user.limit_not_positive", &lang, None), &i18n, &lang).await;
    }
    if days < 1 {
        return reply_with_back_menu(&bot, &msg, i18n.t("create_user.expiration_not_positive", &lang, None), &i18n, &lang).await;
    }

    let validator = services.provisioning_service.validator();
    let limit = i32::try_from(limit).unwrap_or(i32::MAX);
    if let Err(e) = validator.check_expiration_days_value(days) {
        log_step_rejected(user_id, steps::EXPIRATION_DATE, &e.to_string());
        return reply_with_back_menu(&bot, &msg, i18n.t("create_user.failed", &lang, None), &i18n, &lang).await;
    }

    let new_user = match services
        .provisioning_service
        .build_user(username, password, limit, days)
    {
        Ok(new_user) => new_user,
        Err(e) => {
            log_step_rejected(user_id, steps::EXPIRATION_DATE, &e.to_string());
            return reply_with_back_menu(&bot, &msg, i18n.t("create_user.failed", &lang, None), &i18n, &lang).await;
        }
    };

    provision_and_reply(&bot, &msg, user_id, new_user, &services, &i18n, &lang).await
}

/// Handle /cancel
pub async fn handle_cancel(bot: Bot, msg: Message, state_storage: StateStorage, i18n: I18n) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BotError::InvalidInput("No user in message".to_string())
    })?;
    let user_id = user.id.0 as i64;
    let lang = i18n.detect_user_language(user.language_code.as_deref());

    let key = if state_storage.delete_context(user_id).await? {
        log_user_action(user_id, "conversation_cancelled", None);
        "cancel.done"
    } else {
        "cancel.nothing"
    };

    bot.send_message(msg.chat.id, i18n.t(key, &lang, None)).await?;
    Ok(())
}

/// Digits-only argument; `None` when it is not a (representable) number
fn parse_number(arg: &str) -> Option<i64> {
    if !is_ascii_number(arg) {
        return None;
    }
    arg.parse::<i64>().ok()
}

async fn provision_and_reply(
    bot: &Bot,
    msg: &Message,
    actor_id: i64,
    new_user: NewUser,
    services: &ServiceFactory,
    i18n: &I18n,
    lang: &str,
) -> Result<()> {
    match services.provisioning_service.provision(actor_id, new_user).await {
        Ok(user) => send_user_created(bot, msg, &user, i18n, lang).await,
        Err(BotError::Validation(e)) => {
            debug!(actor_id = actor_id, error = %e, "Assembled user rejected");
            reply_with_back_menu(bot, msg, i18n.t("create_user.failed", lang, None), i18n, lang).await
        }
        Err(BotError::QuotaExhausted { .. }) => {
            reply_with_back_menu(bot, msg, i18n.t("create_user.quota_exhausted", lang, None), i18n, lang).await
        }
        Err(e) => {
            warn!(actor_id = actor_id, error = %e, "User creation failed");
            let text = i18n.t(
                "create_user.error",
                lang,
                Some(&params(&[("reason", html::escape(&e.to_string()))])),
            );
            bot.send_message(msg.chat.id, text)
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
            Ok(())
        }
    }
}

/// Reply to the triggering message with the created user's summary
pub async fn send_user_created(
    bot: &Bot,
    msg: &Message,
    user: &ProvisionedUser,
    i18n: &I18n,
    lang: &str,
) -> Result<()> {
    let text = i18n.t(
        "create_user.success",
        lang,
        Some(&params(&[
            ("username", html::escape(&user.username)),
            ("password", html::escape(&user.password)),
            ("limit", user.connection_limit.to_string()),
            ("expiration", format_expiration_date(user.expiration_date)),
        ])),
    );

    reply_with_back_menu(bot, msg, text, i18n, lang).await
}

async fn reply_with_back_menu(bot: &Bot, msg: &Message, text: String, i18n: &I18n, lang: &str) -> Result<()> {
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .reply_markup(back_menu_keyboard(i18n, lang))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("30"), Some(30));
        assert_eq!(parse_number("0"), Some(0));
        assert_eq!(parse_number("-1"), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("99999999999999999999"), None);
    }
}
