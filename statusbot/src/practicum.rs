use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::PollError;

/// Homework-review API endpoint.
pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Source of homework status data for the polling loop.
///
/// Abstracted so the loop can be driven by scripted responses in
/// tests; the production implementation is [`PracticumClient`].
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch submissions whose status changed since `from_date`
    /// (seconds since epoch). Returns the decoded response body.
    async fn fetch(&self, from_date: u64) -> Result<Value, PollError>;
}

/// Client for the homework-review API.
pub struct PracticumClient {
    client: reqwest::Client,
    token: String,
}

impl PracticumClient {
    pub fn new(token: String, request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("statusbot/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, token }
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: u64) -> Result<Value, PollError> {
        debug!("Requesting homework statuses with from_date={}", from_date);

        let response = self
            .client
            .get(ENDPOINT)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(PollError::Request)?;

        // The API documents exactly 200 as success.
        if response.status() != StatusCode::OK {
            return Err(PollError::UnexpectedHttpStatus(response.status()));
        }

        let body: Value = response.json().await.map_err(PollError::Decode)?;
        debug!("Decoded homework API response");

        Ok(body)
    }
}
