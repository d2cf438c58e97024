//! Builders for Telegram updates
//!
//! Messages and callback queries are built from JSON the way the Bot API
//! delivers them.

use serde_json::{json, Value};
use teloxide::types::{CallbackQuery, Message, MessageId};

static NEXT_MESSAGE_ID: std::sync::atomic::AtomicI32 = std::sync::atomic::AtomicI32::new(100);

fn next_message_id() -> i32 {
    NEXT_MESSAGE_ID.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

fn user_json(user_id: i64, language_code: &str) -> Value {
    json!({
        "id": user_id,
        "is_bot": false,
        "first_name": "Tester",
        "username": format!("tester{}", user_id),
        "language_code": language_code
    })
}

fn message_json(message_id: i32, user_id: i64, chat_id: i64, text: &str, language_code: &str) -> Value {
    let chat = if chat_id > 0 {
        json!({"id": chat_id, "type": "private", "first_name": "Tester"})
    } else {
        json!({"id": chat_id, "type": "supergroup", "title": "Resellers"})
    };

    json!({
        "message_id": message_id,
        "date": 1700000000,
        "chat": chat,
        "from": user_json(user_id, language_code),
        "text": text
    })
}

/// A text message from `user_id` in their private chat
pub fn text_message(user_id: i64, text: &str) -> Message {
    text_message_in(user_id, user_id, text)
}

/// A text message from `user_id` in `chat_id`
pub fn text_message_in(user_id: i64, chat_id: i64, text: &str) -> Message {
    localized_message(user_id, chat_id, text, "pt-BR")
}

pub fn localized_message(user_id: i64, chat_id: i64, text: &str, language_code: &str) -> Message {
    serde_json::from_value(message_json(next_message_id(), user_id, chat_id, text, language_code))
        .expect("valid message json")
}

/// A callback query pressed by `user_id` on a bot message in their private chat
pub fn callback_query(user_id: i64, data: &str) -> CallbackQuery {
    serde_json::from_value(json!({
        "id": format!("cb-{}", next_message_id()),
        "from": user_json(user_id, "pt-BR"),
        "chat_instance": "instance",
        "data": data,
        "message": message_json(next_message_id(), 12345, user_id, "menu", "pt-BR")
    }))
    .expect("valid callback query json")
}

pub fn message_id(msg: &Message) -> i32 {
    let MessageId(id) = msg.id;
    id
}
