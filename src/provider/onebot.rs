//! A backend pushing messages to a OneBot (QQ bot) HTTP endpoint.
//!
//! Text only; events reach it through the template fallback. This adapter
//! owns the benign-false-failure sentinel: some OneBot gateways confirm
//! delivery and then drop the connection with a fixed 7-byte frame instead
//! of a JSON ack. The adapter maps exactly that frame to
//! [`SendError::ShortResponse`] so the dispatch layer can count it as a
//! successful delivery; every other malformed response stays an error.

use super::{MessageSender, SendError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Name of the OneBot provider.
pub const NAME: &str = "onebot";

/// The truncated frame a gateway emits after a delivered message.
const SHORT_READ_ACK: &[u8] = b"\x00\x00\x00\x1a\x00\x00\x00";

/// Configuration blob for [`OneBotSender`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneBotConfig {
    /// Base URL of the OneBot HTTP API, e.g. `http://127.0.0.1:3000`.
    pub endpoint: String,
    /// Optional access token sent as a bearer Authorization header.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Group to push to. Takes precedence over `user_id` when both are set.
    #[serde(default)]
    pub group_id: Option<i64>,
    /// User to push to when no group is configured.
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Minimal shape of a well-formed OneBot API response.
#[derive(Debug, Deserialize)]
struct OneBotAck {
    retcode: i64,
}

/// A backend pushing plain text over the OneBot `send_msg` action.
pub struct OneBotSender {
    config: OneBotConfig,
    client: reqwest::Client,
}

impl OneBotSender {
    /// Creates a new `OneBotSender` from its configuration.
    pub fn new(config: OneBotConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    fn payload(&self, text: &str) -> Result<serde_json::Value, SendError> {
        if let Some(group_id) = self.config.group_id {
            Ok(json!({
                "message_type": "group",
                "group_id": group_id,
                "message": text,
            }))
        } else if let Some(user_id) = self.config.user_id {
            Ok(json!({
                "message_type": "private",
                "user_id": user_id,
                "message": text,
            }))
        } else {
            Err(SendError::Backend(
                "onebot: neither group_id nor user_id configured".to_string(),
            ))
        }
    }
}

#[async_trait]
impl MessageSender for OneBotSender {
    fn name(&self) -> &'static str {
        NAME
    }

    fn configuration(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    async fn send_text(&self, message: &str, title: &str) -> Result<(), SendError> {
        let text = if title.is_empty() {
            message.to_string()
        } else {
            format!("{title}\n{message}")
        };

        let url = format!("{}/send_msg", self.config.endpoint.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&self.payload(&text)?);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(SendError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        if body.as_ref() == SHORT_READ_ACK {
            return Err(SendError::ShortResponse(body.to_vec()));
        }

        let ack: OneBotAck = serde_json::from_slice(&body).map_err(|_| {
            SendError::Backend(format!(
                "onebot: unparseable response: {}",
                String::from_utf8_lossy(&body)
            ))
        })?;
        if ack.retcode != 0 {
            return Err(SendError::Backend(format!(
                "onebot: retcode {}",
                ack.retcode
            )));
        }

        debug!(title, "sent message via OneBot");
        Ok(())
    }
}
