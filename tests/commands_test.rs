//! Command handler integration tests
//!
//! `/create_user`, `/quota`, `/add_dealer`, `/cancel` and `/start` driven
//! through `handle_command`.

mod helpers;

use helpers::*;
use ProvisionBot::database::UserStore;
use ProvisionBot::handlers::keyboards::{BACK_MENU_CALLBACK, CREATE_USER_CALLBACK};
use ProvisionBot::handlers::{handle_callback_query, handle_command, report_failure, Command};
use ProvisionBot::utils::helpers::format_expiration_date;
use teloxide::utils::command::BotCommands;

const DEALER_ID: i64 = 700003;

async fn run(ctx: &TestContext, user_id: i64, text: &str) -> teloxide::types::Message {
    let msg = text_message(user_id, text);
    let cmd = Command::parse(text, "provision_bot").expect("command parses");
    handle_command(
        ctx.bot.clone(),
        msg.clone(),
        cmd,
        ctx.services.clone(),
        ctx.state_storage.clone(),
        ctx.i18n.clone(),
    )
    .await
    .unwrap();
    msg
}

#[test]
fn test_command_parsing() {
    assert_eq!(
        Command::parse("/create_user alice pass 2 30", "bot").unwrap(),
        Command::CreateUser("alice pass 2 30".to_string())
    );
    assert_eq!(Command::parse("/quota", "bot").unwrap(), Command::Quota);
    assert_eq!(
        Command::parse("/add_dealer 123 10", "bot").unwrap(),
        Command::AddDealer("123 10".to_string())
    );
    assert_eq!(Command::parse("/menu", "bot").unwrap(), Command::Menu);
}

#[tokio::test]
async fn test_create_user_command_success() {
    let ctx = TestContext::new().await;

    let msg = run(&ctx, test_admin_id(), "/create_user alice s3cret 2 30").await;

    let user = ctx.users.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(user.connection_limit, 2);

    let summary = ctx.telegram_mock.last_message().await;
    assert!(summary.is_reply_to(message_id(&msg)));
    assert!(summary.text().contains("<code>alice</code>"));
    assert!(summary
        .text()
        .contains(&format!("<code>{}</code>", format_expiration_date(user.expiration_date))));
    assert_eq!(summary.callback_buttons(), vec![BACK_MENU_CALLBACK.to_string()]);
}

#[tokio::test]
async fn test_create_user_command_wrong_arity_shows_usage() {
    let ctx = TestContext::new().await;

    run(&ctx, test_admin_id(), "/create_user alice s3cret 2").await;

    assert_eq!(ctx.telegram_mock.last_message().await.text(), ctx.t("create_user.usage"));
    assert_eq!(ctx.users.count().await, 0);
}

#[tokio::test]
async fn test_create_user_command_numeric_checks() {
    let ctx = TestContext::new().await;
    let cases = [
        ("/create_user alice s3cret two 30", "create_user.limit_not_number"),
        ("/create_user alice s3cret 2 soon", "create_user.expiration_not_number"),
        ("/create_user alice s3cret 0 30", "create_user.limit_not_positive"),
        ("/create_user alice s3cret 2 0", "create_user.expiration_not_positive"),
        ("/create_user alice s3cret 2 99999999", "create_user.failed"),
        ("/create_user 9alice s3cret 2 30", "create_user.failed"),
    ];

    for (text, key) in cases {
        run(&ctx, test_admin_id(), text).await;
        assert_eq!(ctx.telegram_mock.last_message().await.text(), ctx.t(key), "{}", text);
    }
    assert_eq!(ctx.users.count().await, 0);
}

#[tokio::test]
async fn test_create_user_command_denied_for_plain_user() {
    let ctx = TestContext::new().await;

    run(&ctx, test_user_id(), "/create_user alice s3cret 2 30").await;

    assert_eq!(ctx.telegram_mock.last_message().await.text(), ctx.t("permission.denied"));
    assert_eq!(ctx.users.count().await, 0);
}

#[tokio::test]
async fn test_create_user_command_respects_dealer_quota() {
    let ctx = TestContext::new().await;
    ctx.add_dealer(DEALER_ID, 1).await;

    run(&ctx, DEALER_ID, "/create_user first s3cret 1 30").await;
    run(&ctx, DEALER_ID, "/create_user second s3cret 1 30").await;

    assert_eq!(
        ctx.telegram_mock.last_message().await.text(),
        ctx.t("create_user.quota_exhausted")
    );
    assert!(ctx.users.find_by_username("first").await.unwrap().is_some());
    assert!(ctx.users.find_by_username("second").await.unwrap().is_none());
}

#[tokio::test]
async fn test_quota_command() {
    let ctx = TestContext::new().await;
    ctx.add_dealer(DEALER_ID, 4).await;

    run(&ctx, DEALER_ID, "/create_user first s3cret 1 30").await;
    run(&ctx, DEALER_ID, "/quota").await;
    let text = ctx.telegram_mock.last_message().await.text().to_string();
    assert!(text.contains("<b>3</b>"));
    assert!(text.contains("<b>1</b>"));

    run(&ctx, test_admin_id(), "/quota").await;
    assert_eq!(ctx.telegram_mock.last_message().await.text(), ctx.t("quota.not_dealer"));
}

#[tokio::test]
async fn test_add_dealer_command() {
    let ctx = TestContext::new().await;

    run(&ctx, test_admin_id(), &format!("/add_dealer {} 5", DEALER_ID)).await;
    assert_eq!(ctx.dealers.limit_of(DEALER_ID).await, Some(5));
    assert!(ctx.telegram_mock.last_message().await.text().contains(&DEALER_ID.to_string()));

    run(&ctx, test_admin_id(), "/add_dealer nope").await;
    assert_eq!(ctx.telegram_mock.last_message().await.text(), ctx.t("dealers.usage"));

    // dealers cannot promote others
    run(&ctx, DEALER_ID, "/add_dealer 42 100").await;
    assert_eq!(ctx.telegram_mock.last_message().await.text(), ctx.t("permission.denied"));
    assert_eq!(ctx.dealers.limit_of(42).await, None);
}

#[tokio::test]
async fn test_start_shows_menu_with_quota_for_dealer() {
    let ctx = TestContext::new().await;
    ctx.add_dealer(DEALER_ID, 7).await;

    run(&ctx, DEALER_ID, "/start").await;

    let menu = ctx.telegram_mock.last_message().await;
    assert!(menu.text().starts_with(&ctx.t("menu.title")));
    assert!(menu.text().contains("<b>7</b>"));
    assert_eq!(menu.callback_buttons(), vec![CREATE_USER_CALLBACK.to_string()]);
}

#[tokio::test]
async fn test_cancel_drops_open_conversation() {
    let ctx = TestContext::new().await;
    let admin = test_admin_id();

    handle_callback_query(
        ctx.bot.clone(),
        callback_query(admin, CREATE_USER_CALLBACK),
        ctx.services.clone(),
        ctx.scenario_manager.clone(),
        ctx.state_storage.clone(),
        ctx.i18n.clone(),
    )
    .await
    .unwrap();
    assert!(ctx.state_storage.load_context(admin).await.unwrap().is_some());

    run(&ctx, admin, "/cancel").await;
    assert_eq!(ctx.telegram_mock.last_message().await.text(), ctx.t("cancel.done"));
    assert!(ctx.state_storage.load_context(admin).await.unwrap().is_none());

    run(&ctx, admin, "/cancel").await;
    assert_eq!(ctx.telegram_mock.last_message().await.text(), ctx.t("cancel.nothing"));
}

#[tokio::test]
async fn test_help_command() {
    let ctx = TestContext::new().await;

    run(&ctx, test_user_id(), "/help").await;

    assert_eq!(ctx.telegram_mock.last_message().await.text(), ctx.t("help.text"));
}

#[tokio::test]
async fn test_report_failure_sends_generic_error() {
    let ctx = TestContext::new().await;
    let chat_id = teloxide::types::ChatId(test_user_id());

    report_failure(&ctx.bot, chat_id, &ctx.i18n, Some("en")).await.unwrap();

    let sent = ctx.telegram_mock.last_message().await;
    assert_eq!(sent.chat_id(), Some(test_user_id()));
    assert_eq!(sent.text(), ctx.i18n.t("errors.generic", "en", None));
}

#[tokio::test]
async fn test_create_user_command_keeps_braces_in_values() {
    let ctx = TestContext::new().await;

    run(&ctx, test_admin_id(), "/create_user alice {username} 2 30").await;

    let summary = ctx.telegram_mock.last_message().await;
    assert!(summary.text().contains("<code>alice</code>"));
    assert!(summary.text().contains("<code>{username}</code>"));
}
