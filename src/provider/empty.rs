//! The neutral no-op backend.
//!
//! Installed whenever no real provider is selectable: notifications are
//! switched to "none", the selected provider has no persisted
//! configuration yet (selection raced ahead of bootstrap), or a provider
//! failed to construct. Accepts every message and discards it.

use super::{MessageSender, SendError};
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

/// Name of the no-op provider.
pub const NAME: &str = "empty";

/// A backend that accepts and discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySender;

#[async_trait]
impl MessageSender for EmptySender {
    fn name(&self) -> &'static str {
        NAME
    }

    fn configuration(&self) -> serde_json::Value {
        json!({})
    }

    async fn send_text(&self, _message: &str, title: &str) -> Result<(), SendError> {
        debug!(title, "empty sender dropping message");
        Ok(())
    }
}
