//! A backend for sending notifications to Slack.
//!
//! Posts to a Slack incoming webhook. Text only: structured events reach
//! this backend through the template fallback in the dispatch layer.

use super::{MessageSender, SendError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Name of the Slack provider.
pub const NAME: &str = "slack";

/// Configuration blob for [`SlackSender`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackConfig {
    /// The Slack incoming webhook URL.
    pub webhook_url: String,
}

/// A backend for sending messages to a Slack webhook.
pub struct SlackSender {
    config: SlackConfig,
    client: reqwest::Client,
}

impl SlackSender {
    /// Creates a new `SlackSender` from its configuration.
    pub fn new(config: SlackConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }
}

#[async_trait]
impl MessageSender for SlackSender {
    fn name(&self) -> &'static str {
        NAME
    }

    fn configuration(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    async fn send_text(&self, message: &str, title: &str) -> Result<(), SendError> {
        let payload = json!({ "text": format!("*{title}*\n{message}") });

        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(title, "sent message to Slack");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SendError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
