//! A generic webhook backend.
//!
//! Posts JSON to a configured URL. This is the one shipped backend with
//! native event support: structured events go out as a JSON document
//! instead of being flattened to text.

use super::{EventSender, MessageSender, SendError};
use crate::core::EventMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Name of the webhook provider.
pub const NAME: &str = "webhook";

/// Configuration blob for [`WebhookSender`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Target URL for all POST requests.
    pub url: String,
    /// Optional bearer token sent in the Authorization header.
    #[serde(default)]
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// A backend that delivers notifications as JSON POST requests.
pub struct WebhookSender {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookSender {
    /// Creates a new `WebhookSender` from its configuration.
    pub fn new(config: WebhookConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    async fn post(&self, payload: &serde_json::Value) -> Result<(), SendError> {
        let mut request = self.client.post(&self.config.url).json(payload);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            debug!(url = %self.config.url, "webhook delivered");
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

#[async_trait]
impl MessageSender for WebhookSender {
    fn name(&self) -> &'static str {
        NAME
    }

    fn configuration(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    async fn send_text(&self, message: &str, title: &str) -> Result<(), SendError> {
        self.post(&json!({ "title": title, "body": message })).await
    }

    fn as_event_sender(&self) -> Option<&dyn EventSender> {
        Some(self)
    }
}

#[async_trait]
impl EventSender for WebhookSender {
    async fn send_event(&self, event: &EventMessage) -> Result<(), SendError> {
        let payload = serde_json::to_value(event)
            .map_err(|e| SendError::Backend(format!("failed to encode event: {e}")))?;
        self.post(&json!({ "event": payload })).await
    }
}

#[cfg(test)]
mod webhook_sender_tests {
    use super::*;
    use crate::core::EventClient;
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sender_for(server: &MockServer) -> WebhookSender {
        WebhookSender::new(WebhookConfig {
            url: format!("{}/hook", server.uri()),
            token: Some("s3cret".to_string()),
            timeout_seconds: 5,
        })
    }

    #[tokio::test]
    async fn test_send_text_posts_title_and_body() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("authorization", "Bearer s3cret"))
            .and(body_partial_json(
                serde_json::json!({ "title": "CPU", "body": "load is high" }),
            ))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        // Act
        let result = sender_for(&server).send_text("load is high", "CPU").await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_event_posts_structured_payload() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(serde_json::json!({
                "event": { "event": "host_offline", "clients": [{ "uuid": "u-1" }] }
            })))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let event = EventMessage {
            event: "host_offline".to_string(),
            message: "gone".to_string(),
            emoji: "⚠️".to_string(),
            time: Utc.with_ymd_and_hms(2025, 7, 8, 12, 0, 0).unwrap(),
            clients: vec![EventClient {
                name: "web-01".to_string(),
                uuid: "u-1".to_string(),
            }],
        };

        // Act
        let result = sender_for(&server).send_event(&event).await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_server_error_is_reported_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let result = sender_for(&server).send_text("hi", "t").await;

        match result {
            Err(SendError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
