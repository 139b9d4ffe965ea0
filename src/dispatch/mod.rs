//! The outbound delivery operations of the notification core.
//!
//! [`Dispatcher`] carries the two public entry points, `send_text` and
//! `send_event`. Every call checks that a backend is installed and that
//! notifications are globally enabled, then runs a bounded retry loop and
//! audit-logs the final outcome. Concurrent callers are fine: the only
//! shared state is the active-provider holder, and no lock is held while a
//! backend call is in flight.

pub mod bootstrap;
pub mod holder;

pub use holder::ActiveProvider;

use crate::core::{AuditSink, EventMessage, SettingsStore, Severity, StoreError};
use crate::provider::SendError;
use crate::template::{render, DEFAULT_TEMPLATE};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Fixed ceiling of sequential delivery attempts per dispatch call.
pub const SEND_ATTEMPTS: usize = 3;

/// Errors surfaced to dispatch callers.
///
/// Everything else (benign false failures, bootstrap problems) is absorbed
/// and only observable through the audit log.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No active backend has been installed yet.
    #[error("message sender provider is not initialized")]
    NotInitialized,

    /// The global notification settings could not be read.
    #[error("failed to read notification settings: {0}")]
    Settings(#[from] StoreError),

    /// The backend still reported an error after the final attempt.
    #[error("delivery failed: {0}")]
    Delivery(SendError),
}

/// The dispatch layer: text and event delivery over the active backend.
#[derive(Clone)]
pub struct Dispatcher {
    active: Arc<ActiveProvider>,
    settings: Arc<dyn SettingsStore>,
    audit: Arc<dyn AuditSink>,
}

impl Dispatcher {
    /// Creates a new `Dispatcher` over an active-provider holder and its
    /// collaborator stores.
    pub fn new(
        active: Arc<ActiveProvider>,
        settings: Arc<dyn SettingsStore>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            active,
            settings,
            audit,
        }
    }

    /// Delivers a plain text message through the active backend.
    ///
    /// Returns `Ok(())` without touching the backend when notifications
    /// are globally disabled. Otherwise up to [`SEND_ATTEMPTS`] sequential
    /// attempts are made, with no delay in between, stopping at the first
    /// success. The final outcome is audit-logged under the title.
    pub async fn send_text(&self, message: &str, title: &str) -> Result<(), DispatchError> {
        let provider = match self.active.current() {
            Some(provider) => provider,
            None => return Err(DispatchError::NotInitialized),
        };
        let settings = self.settings.notification_settings().await?;
        if !settings.enabled {
            debug!(title, "notifications disabled, dropping text message");
            return Ok(());
        }

        let mut last = provider.send_text(message, title).await;
        for attempt in 1..SEND_ATTEMPTS {
            match &last {
                Ok(()) => break,
                Err(err) => {
                    debug!(attempt, %err, "text delivery attempt failed");
                    last = provider.send_text(message, title).await;
                }
            }
        }

        match last {
            Ok(()) => {
                self.audit_info(&format!("Message sent: {title}")).await;
                Ok(())
            }
            Err(err) => {
                self.audit_error(&format!(
                    "Failed to send message after {SEND_ATTEMPTS} attempts: {err},{title}"
                ))
                .await;
                Err(DispatchError::Delivery(err))
            }
        }
    }

    /// Delivers a structured event through the active backend.
    ///
    /// Backends advertising native event support receive the event as-is;
    /// all others receive it flattened through the template renderer (the
    /// configured template, or the built-in default) over the plain text
    /// path. On both routes a recognized benign false failure from the
    /// backend counts as a success and stops the retry loop.
    pub async fn send_event(&self, event: &EventMessage) -> Result<(), DispatchError> {
        let provider = match self.active.current() {
            Some(provider) => provider,
            None => return Err(DispatchError::NotInitialized),
        };
        let settings = self.settings.notification_settings().await?;
        if !settings.enabled {
            debug!(event = %event.event, "notifications disabled, dropping event");
            return Ok(());
        }

        if let Some(sender) = provider.as_event_sender() {
            let mut last = sender.send_event(event).await;
            for attempt in 1..SEND_ATTEMPTS {
                match &last {
                    Ok(()) => break,
                    Err(err) if err.is_false_failure() => break,
                    Err(err) => {
                        debug!(attempt, %err, "event delivery attempt failed");
                        last = sender.send_event(event).await;
                    }
                }
            }
            return self.finish_event(event, last).await;
        }

        // No native event support: flatten through the template renderer
        // and reuse the text capability.
        let template = settings.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        let rendered = render(template, event);

        let mut last = provider.send_text(&rendered, &event.event).await;
        for attempt in 1..SEND_ATTEMPTS {
            match &last {
                Ok(()) => break,
                Err(err) if err.is_false_failure() => break,
                Err(err) => {
                    debug!(attempt, %err, "rendered event delivery attempt failed");
                    last = provider.send_text(&rendered, &event.event).await;
                }
            }
        }
        self.finish_event(event, last).await
    }

    /// Audit-logs the final outcome of an event delivery and maps it to
    /// the caller-visible result.
    async fn finish_event(
        &self,
        event: &EventMessage,
        last: Result<(), SendError>,
    ) -> Result<(), DispatchError> {
        match last {
            Ok(()) => {
                self.audit_info(&format!("Event message sent: {}", event.event))
                    .await;
                Ok(())
            }
            Err(err) if err.is_false_failure() => {
                debug!(event = %event.event, %err, "absorbing benign delivery error");
                self.audit_info(&format!("Event message sent: {}", event.event))
                    .await;
                Ok(())
            }
            Err(err) => {
                self.audit_error(&format!(
                    "Failed to send event message after {SEND_ATTEMPTS} attempts: {err},{}",
                    event.event
                ))
                .await;
                Err(DispatchError::Delivery(err))
            }
        }
    }

    async fn audit_info(&self, message: &str) {
        self.audit.log("", "", message, Severity::Info).await;
    }

    async fn audit_error(&self, message: &str) {
        self.audit.log("", "", message, Severity::Error).await;
    }
}
