//! Mock Telegram API Server for testing
//!
//! A wiremock server standing in for the Telegram Bot API. Every request the
//! bot makes is recorded so tests can inspect what would have been sent.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

/// One recorded Bot API call
#[derive(Debug, Clone)]
pub struct SentRequest {
    /// Lower-cased method name, e.g. `sendmessage`
    pub method: String,
    pub body: Value,
}

impl SentRequest {
    pub fn text(&self) -> &str {
        self.body.get("text").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn chat_id(&self) -> Option<i64> {
        self.body.get("chat_id").and_then(Value::as_i64)
    }

    pub fn reply_markup(&self) -> Option<&Value> {
        self.body.get("reply_markup")
    }

    pub fn has_force_reply(&self) -> bool {
        self.reply_markup()
            .and_then(|m| m.get("force_reply"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Callback data of every inline button attached to the message
    pub fn callback_buttons(&self) -> Vec<String> {
        self.reply_markup()
            .and_then(|m| m.get("inline_keyboard"))
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .filter_map(Value::as_array)
                    .flatten()
                    .filter_map(|b| b.get("callback_data").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_reply_to(&self, message_id: i32) -> bool {
        self.body
            .get("reply_parameters")
            .and_then(|p| p.get("message_id"))
            .and_then(Value::as_i64)
            == Some(message_id as i64)
    }
}

impl TelegramMockServer {
    /// Create a mock server answering sendMessage and answerCallbackQuery
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let mock = Self { server };
        mock.setup_default_mocks().await;
        mock
    }

    /// A bot pointed at this server
    pub fn bot(&self) -> Bot {
        let url = url::Url::parse(&self.server.uri()).expect("mock server uri");
        Bot::new(test_bot_token()).set_api_url(url)
    }

    pub async fn setup_default_mocks(&self) {
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)/bot.+/sendmessage$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {
                    "message_id": 9001,
                    "date": 1700000000,
                    "chat": {"id": test_user_id(), "type": "private", "first_name": "Test"},
                    "from": {"id": 12345, "is_bot": true, "first_name": "ProvisionBot", "username": "provision_bot"},
                    "text": "ok"
                }
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path_regex(r"(?i)/bot.+/answercallbackquery$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
            .mount(&self.server)
            .await;
    }

    /// All recorded requests, oldest first
    pub async fn requests(&self) -> Vec<SentRequest> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|req| SentRequest {
                method: req
                    .url
                    .path()
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_lowercase(),
                body: serde_json::from_slice(&req.body).unwrap_or(Value::Null),
            })
            .collect()
    }

    /// Recorded sendMessage calls
    pub async fn sent_messages(&self) -> Vec<SentRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.method == "sendmessage")
            .collect()
    }

    /// Recorded answerCallbackQuery calls
    pub async fn callback_answers(&self) -> Vec<SentRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.method == "answercallbackquery")
            .collect()
    }

    pub async fn last_message(&self) -> SentRequest {
        self.sent_messages()
            .await
            .pop()
            .expect("no message was sent")
    }

    pub async fn reset(&self) {
        self.server.reset().await;
        self.setup_default_mocks().await;
    }
}

/// Helper function to create a test bot token
pub fn test_bot_token() -> String {
    "12345:test_token".to_string()
}

/// Admin configured in test settings
pub fn test_admin_id() -> i64 {
    555666777
}

/// Plain user id with no permissions unless registered as a dealer
pub fn test_user_id() -> i64 {
    987654321
}
