//! Enumerates known provider kinds and constructs instances.
//!
//! The registry is the single place that knows how to turn a persisted
//! configuration blob into a ready-to-use backend, and which default
//! configuration the bootstrap task should persist for each kind.

use super::onebot::{self, OneBotConfig};
use super::slack::{self, SlackConfig};
use super::webhook::{self, WebhookConfig};
use super::{empty, EmptySender, MessageSender, OneBotSender, SlackSender, WebhookSender};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

/// Errors from provider construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No provider kind with this name is known.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// The configuration blob did not decode into the provider's
    /// configuration shape.
    #[error("invalid configuration for provider {provider}: {source}")]
    InvalidConfig {
        provider: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Factory for the pluggable set of message-sender backends.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Creates the registry.
    pub fn new() -> Self {
        Self
    }

    /// Names of every known provider kind, in bootstrap order.
    pub fn kinds(&self) -> &'static [&'static str] {
        &[empty::NAME, webhook::NAME, slack::NAME, onebot::NAME]
    }

    /// The default configuration persisted for a kind during bootstrap.
    ///
    /// Asks a default-constructed instance for its current configuration,
    /// the same view configuration editors work with. Returns `None` for
    /// unknown kinds; bootstrap skips those.
    pub fn default_config(&self, name: &str) -> Option<serde_json::Value> {
        self.build_default(name).map(|p| p.configuration())
    }

    /// Constructs the named backend with its default configuration.
    fn build_default(&self, name: &str) -> Option<Arc<dyn MessageSender>> {
        match name {
            empty::NAME => Some(Arc::new(EmptySender)),
            webhook::NAME => Some(Arc::new(WebhookSender::new(WebhookConfig::default()))),
            slack::NAME => Some(Arc::new(SlackSender::new(SlackConfig::default()))),
            onebot::NAME => Some(Arc::new(OneBotSender::new(OneBotConfig::default()))),
            _ => None,
        }
    }

    /// Constructs the named backend from a serialized configuration blob.
    ///
    /// The returned instance is fully constructed and ready to send; this
    /// is the only path by which backends come into existence, so the
    /// active-provider holder never sees a partially-initialized one.
    pub fn build(
        &self,
        name: &str,
        addition: &str,
    ) -> Result<Arc<dyn MessageSender>, RegistryError> {
        match name {
            empty::NAME => Ok(Arc::new(EmptySender)),
            webhook::NAME => {
                let config: WebhookConfig = decode(name, addition)?;
                Ok(Arc::new(WebhookSender::new(config)))
            }
            slack::NAME => {
                let config: SlackConfig = decode(name, addition)?;
                Ok(Arc::new(SlackSender::new(config)))
            }
            onebot::NAME => {
                let config: OneBotConfig = decode(name, addition)?;
                Ok(Arc::new(OneBotSender::new(config)))
            }
            other => Err(RegistryError::UnknownProvider(other.to_string())),
        }
    }
}

fn decode<T: DeserializeOwned>(name: &str, addition: &str) -> Result<T, RegistryError> {
    serde_json::from_str(addition).map_err(|source| RegistryError::InvalidConfig {
        provider: name.to_string(),
        source,
    })
}
