// Thin Telegram Bot API client: only the methods the bot needs.
// https://core.telegram.org/bots/api

use std::time::Duration;

pub mod error;
pub mod models;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

pub use crate::error::{Result, TelegramError};
use crate::models::{ApiResponse, SendMessage, SentMessage, Update, User};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Update kinds requested from Telegram, for polling and webhooks alike.
pub const ALLOWED_UPDATES: &[&str] = &["message", "edited_message", "callback_query"];

#[derive(Clone)]
pub struct TelegramOptions {
    pub token: String,
    pub base_url: String,
}

impl TelegramOptions {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for TelegramOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramOptions")
            .field("token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TelegramService {
    options: TelegramOptions,
    client: Client,
}

impl TelegramService {
    pub fn new(options: TelegramOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{base}/bot{token}/{method}",
            base = self.options.base_url.trim_end_matches('/'),
            token = self.options.token,
            method = method
        )
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await
            // reqwest errors embed the request URL, which contains the token
            .map_err(|e| TelegramError::Network(e.without_url().to_string()))?;

        let status = res.status();
        let envelope = res
            .json::<ApiResponse<T>>()
            .await
            .map_err(|e| TelegramError::Parse(e.without_url().to_string()));

        match envelope {
            Ok(ApiResponse {
                ok: true,
                result: Some(result),
                ..
            }) => Ok(result),
            Ok(envelope) => {
                let description = envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string());
                warn!(method = method, status = %status, description = %description, "Telegram API error");
                Err(TelegramError::Api {
                    code: envelope.error_code.unwrap_or(status.as_u16()),
                    description,
                })
            }
            Err(e) if !status.is_success() => Err(TelegramError::Api {
                code: status.as_u16(),
                description: e.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &json!({}), Duration::from_secs(10)).await
    }

    pub async fn send_message(&self, message: &SendMessage) -> Result<SentMessage> {
        self.call("sendMessage", message, Duration::from_secs(15))
            .await
    }

    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> Result<bool> {
        self.call(
            "sendChatAction",
            &json!({"chat_id": chat_id, "action": action}),
            Duration::from_secs(10),
        )
        .await
    }

    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<bool> {
        self.call(
            "answerCallbackQuery",
            &json!({"callback_query_id": callback_query_id}),
            Duration::from_secs(10),
        )
        .await
    }

    /// Long-poll for updates newer than `offset`.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &get_updates_body(offset, timeout_secs),
            Duration::from_secs(timeout_secs + 10),
        )
        .await
    }

    pub async fn set_webhook(&self, url: &str) -> Result<bool> {
        self.call(
            "setWebhook",
            &set_webhook_body(url),
            Duration::from_secs(15),
        )
        .await
    }

    pub async fn delete_webhook(&self) -> Result<bool> {
        self.call("deleteWebhook", &json!({}), Duration::from_secs(15))
            .await
    }
}

fn get_updates_body(offset: Option<i64>, timeout_secs: u64) -> serde_json::Value {
    let mut body = json!({
        "timeout": timeout_secs,
        "allowed_updates": ALLOWED_UPDATES,
    });
    if let Some(offset) = offset {
        body["offset"] = json!(offset);
    }
    body
}

fn set_webhook_body(url: &str) -> serde_json::Value {
    json!({"url": url, "allowed_updates": ALLOWED_UPDATES})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let mut options = TelegramOptions::new("123:abc");
        options.base_url = "http://localhost:8081/".to_string();
        let service = TelegramService::new(options);

        assert_eq!(
            service.method_url("getMe"),
            "http://localhost:8081/bot123:abc/getMe"
        );
    }

    #[test]
    fn test_edited_messages_are_requested() {
        let expected = json!(["message", "edited_message", "callback_query"]);

        let polling = get_updates_body(Some(7), 30);
        assert_eq!(polling["allowed_updates"], expected);
        assert_eq!(polling["offset"], 7);
        assert_eq!(polling["timeout"], 30);
        assert!(get_updates_body(None, 30).get("offset").is_none());

        let webhook = set_webhook_body("https://bot.example.com/webhook/t");
        assert_eq!(webhook["allowed_updates"], expected);
        assert_eq!(webhook["url"], "https://bot.example.com/webhook/t");
    }

    #[test]
    fn test_options_debug_hides_token() {
        let options = TelegramOptions::new("123:secret");
        assert!(!format!("{:?}", options).contains("secret"));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_network_error() {
        let mut options = TelegramOptions::new("123:abc");
        options.base_url = "http://127.0.0.1:9".to_string();
        let service = TelegramService::new(options);

        let err = service.get_me().await.unwrap_err();
        match err {
            TelegramError::Network(message) => assert!(!message.contains("123:abc")),
            other => panic!("expected network error, got {:?}", other),
        }
    }
}
