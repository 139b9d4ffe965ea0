//! Message-sender providers and their capability contracts.
//!
//! Every backend implements [`MessageSender`], the base text-delivery
//! capability. Backends that understand structured events natively
//! additionally implement [`EventSender`] and advertise it through the
//! typed probe [`MessageSender::as_event_sender`]; dispatch uses the probe
//! to decide between native event delivery and the rendered-text fallback.

pub mod empty;
pub mod onebot;
pub mod registry;
pub mod slack;
pub mod webhook;

use crate::core::EventMessage;
use async_trait::async_trait;
use thiserror::Error;

pub use empty::EmptySender;
pub use onebot::OneBotSender;
pub use registry::{ProviderRegistry, RegistryError};
pub use slack::SlackSender;
pub use webhook::WebhookSender;

/// An error returned by a backend delivery attempt.
#[derive(Debug, Error)]
pub enum SendError {
    /// Transport-level failure talking to the backend.
    #[error("request to backend failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend acknowledged the push but closed the exchange with a
    /// truncated binary frame instead of a well-formed response. Known
    /// behavior of the OneBot push endpoint; the message has been
    /// delivered when this appears.
    #[error("short response from backend: {0:02x?}")]
    ShortResponse(Vec<u8>),

    /// Anything else the backend reports.
    #[error("{0}")]
    Backend(String),
}

impl SendError {
    /// True for error values that are known to mean the message was
    /// actually delivered. Event dispatch treats these as successes and
    /// stops retrying; only the backend adapter that recognizes the
    /// condition produces them.
    pub fn is_false_failure(&self) -> bool {
        matches!(self, SendError::ShortResponse(_))
    }
}

/// Base capability every message-sender backend exposes.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Stable provider name, the key for persisted configuration and for
    /// selecting the active backend.
    fn name(&self) -> &'static str;

    /// The backend's current configuration as a JSON value.
    fn configuration(&self) -> serde_json::Value;

    /// Delivers a plain text message.
    ///
    /// # Arguments
    /// * `message` - The message body
    /// * `title` - A short title or subject line
    async fn send_text(&self, message: &str, title: &str) -> Result<(), SendError>;

    /// Typed capability probe for native structured-event support.
    ///
    /// The default implementation returns `None`; event-capable backends
    /// override it to return themselves.
    fn as_event_sender(&self) -> Option<&dyn EventSender> {
        None
    }
}

/// Optional capability: native delivery of structured events.
#[async_trait]
pub trait EventSender: Send + Sync {
    /// Delivers a structured event without flattening it to text first.
    async fn send_event(&self, event: &EventMessage) -> Result<(), SendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_response_is_the_only_false_failure() {
        assert!(SendError::ShortResponse(vec![0, 0, 0]).is_false_failure());
        assert!(!SendError::Backend("boom".to_string()).is_false_failure());
        assert!(!SendError::Status {
            status: 500,
            body: "oops".to_string()
        }
        .is_false_failure());
    }
}
