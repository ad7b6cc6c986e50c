use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Outbound notification channel.
///
/// Delivery failure is reported to the caller; the polling loop is
/// responsible for swallowing it, since the notifier is also the
/// last-resort channel for reporting other failures and must not feed
/// its own failures back into the loop.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<()>;
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram Bot API client delivering to a fixed chat.
pub struct TelegramClient {
    client: reqwest::Client,
    token: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(token: String, chat_id: String, request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("statusbot/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            token,
            chat_id,
        }
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);

        let response = self
            .client
            .post(&url)
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .context("Failed to send Telegram message")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .context("Failed to read error response body")?;
            return Err(anyhow!("Telegram API error: {} - {}", status, error_text));
        }

        debug!("Delivered message to chat {}", self.chat_id);
        Ok(())
    }
}
