// src/platforms/telegram/notifier.rs
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::platforms::Notifier;

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Bot API response envelope; `description` is only present on failure.
#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    description: Option<String>,
}

/// Sends plain-text messages to one fixed chat through the Telegram Bot API.
pub struct TelegramNotifier {
    http: ReqwestClient,
    bot_token: String,
    chat_id: i64,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: i64) -> Self {
        Self {
            http: ReqwestClient::new(),
            bot_token: bot_token.to_string(),
            chat_id,
        }
    }

    fn send_message_url(&self) -> String {
        format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), Error> {
        // Error strings deliberately omit the URL: it embeds the bot token.
        let resp = self
            .http
            .post(self.send_message_url())
            .json(&SendMessageRequest {
                chat_id: self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e| Error::Notify(format!("sendMessage network error: {}", e.without_url())))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Notify(format!("sendMessage read error: {}", e.without_url())))?;
        let parsed: SendMessageResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Notify(format!("sendMessage: HTTP {status}, parse error: {e}")))?;

        if !parsed.ok {
            return Err(Error::Notify(format!(
                "sendMessage rejected: HTTP {} => {}",
                status,
                parsed.description.unwrap_or_default()
            )));
        }

        debug!("delivered message to chat {}", self.chat_id);
        Ok(())
    }
}
