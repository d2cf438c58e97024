//! Dealer command handlers
//!
//! `/quota` shows a dealer's remaining limit, `/add_dealer` lets admins
//! register dealers or reset their limit.

use teloxide::{Bot, prelude::*, types::{Message, ParseMode}};
use tracing::debug;
use crate::i18n::{I18n, params};
use crate::middleware::{PermissionGuard, ADMIN_PERMISSIONS, CREATE_USER_PERMISSIONS};
use crate::services::ServiceFactory;
use crate::utils::errors::{BotError, Result};
use crate::utils::helpers::{parse_telegram_id, split_args};

/// Handle /quota
pub async fn handle_quota(bot: Bot, msg: Message, services: ServiceFactory, i18n: I18n) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BotError::InvalidInput("No user in message".to_string())
    })?;
    let lang = i18n.detect_user_language(user.language_code.as_deref());

    let guard = PermissionGuard::require_any(&services.auth_service, CREATE_USER_PERMISSIONS);
    let Some(context) = guard.check_message(&bot, &msg, &i18n).await? else {
        return Ok(());
    };

    let text = match services.dealer_service.remaining_quota(context.user_id).await? {
        Some(limit) => {
            let created = services.dealer_service.accounts_created(context.user_id).await?;
            i18n.t(
                "quota.dealer",
                &lang,
                Some(&params(&[("limit", limit as i64), ("created", created)])),
            )
        }
        None => i18n.t("quota.not_dealer", &lang, None),
    };

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Handle `/add_dealer <telegram_id> <limit>`
pub async fn handle_add_dealer(
    bot: Bot,
    msg: Message,
    args: String,
    services: ServiceFactory,
    i18n: I18n,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BotError::InvalidInput("No user in message".to_string())
    })?;
    let lang = i18n.detect_user_language(user.language_code.as_deref());

    let guard = PermissionGuard::require_any(&services.auth_service, ADMIN_PERMISSIONS);
    let Some(context) = guard.check_message(&bot, &msg, &i18n).await? else {
        return Ok(());
    };

    let Some((dealer_id, limit)) = parse_add_dealer_args(&args) else {
        debug!(admin_id = context.user_id, args = %args, "Malformed /add_dealer arguments");
        bot.send_message(msg.chat.id, i18n.t("dealers.usage", &lang, None))
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    };

    let dealer = services
        .dealer_service
        .set_dealer(context.user_id, dealer_id, limit)
        .await?;

    bot.send_message(
        msg.chat.id,
        i18n.t(
            "dealers.saved",
            &lang,
            Some(&params(&[
                ("dealer_id", dealer.id),
                ("limit", dealer.account_creation_limit as i64),
            ])),
        ),
    )
    .parse_mode(ParseMode::Html)
    .await?;

    Ok(())
}

/// `<telegram_id> <limit>` with a non-negative limit
fn parse_add_dealer_args(args: &str) -> Option<(i64, i32)> {
    let [id, limit] = split_args(args)[..] else {
        return None;
    };

    let dealer_id = parse_telegram_id(id)?;
    let limit = limit.parse::<i32>().ok().filter(|l| *l >= 0)?;
    Some((dealer_id, limit))
}
