//! Core domain types and collaborator traits for the notification core.
//!
//! This module defines the fundamental data structures and trait contracts
//! that govern how the dispatch core talks to its surroundings: the global
//! settings store, the per-provider configuration store, and the audit log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel value for "no notification method selected".
pub const METHOD_NONE: &str = "none";

/// A structured event to be delivered through the active provider.
///
/// Immutable once constructed; dispatch takes it by reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventMessage {
    /// Short event name, e.g. "host_offline".
    pub event: String,
    /// Free-text description of what happened.
    pub message: String,
    /// Emoji or icon string shown by providers that render text.
    pub emoji: String,
    /// When the event occurred.
    pub time: DateTime<Utc>,
    /// The monitored clients this event originated from.
    pub clients: Vec<EventClient>,
}

/// A monitored client referenced by an [`EventMessage`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventClient {
    /// Display name; may be blank for unnamed clients.
    pub name: String,
    /// Stable unique identifier, always present.
    pub uuid: String,
}

/// The slice of global configuration the dispatch core consumes.
///
/// Owned by the host application's configuration subsystem; the core only
/// ever reads it, once per dispatch call, through [`SettingsStore`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationSettings {
    /// Name of the selected provider, or "none"/empty for no selection.
    pub method: String,
    /// Global on/off switch; when false, dispatch is a silent no-op.
    pub enabled: bool,
    /// Optional text template used to flatten events for providers without
    /// native event support. `None` selects the built-in template.
    pub template: Option<String>,
}

impl NotificationSettings {
    /// Whether a concrete provider has been selected.
    pub fn provider_selected(&self) -> bool {
        !(self.method.is_empty() || self.method == METHOD_NONE)
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            method: METHOD_NONE.to_string(),
            enabled: false,
            template: None,
        }
    }
}

/// A persisted per-provider configuration row.
///
/// `addition` is an opaque JSON blob of backend-specific fields; only the
/// provider that owns it can interpret it. Rows are created once by the
/// bootstrap task and later edited by configuration flows, never deleted
/// by the dispatch core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderRecord {
    /// Provider name, the storage key.
    pub name: String,
    /// Serialized provider configuration.
    pub addition: String,
}

/// Severity of an audit log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single audit log entry as recorded by an [`AuditSink`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub actor: String,
    pub target: String,
    pub message: String,
    pub severity: Severity,
}

/// Errors reported by the storage collaborators.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store could not be reached or answered abnormally.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Collaborator Traits
// =============================================================================

/// Read access to the global notification settings.
///
/// Settings are hot-mutable in the host service, so dispatch re-reads them
/// on every call instead of caching a snapshot.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the current notification settings.
    async fn notification_settings(&self) -> Result<NotificationSettings, StoreError>;
}

/// Persistence for per-provider configuration rows.
#[async_trait]
pub trait ProviderConfigStore: Send + Sync {
    /// Looks up the configuration row for a provider name.
    async fn find_by_name(&self, name: &str) -> Result<Option<ProviderRecord>, StoreError>;

    /// Inserts a row unless one with the same name already exists.
    ///
    /// # Returns
    /// * `Ok(true)` if the row was inserted
    /// * `Ok(false)` if a row with that name was already present (the
    ///   existing row is left untouched)
    async fn insert_if_absent(&self, record: ProviderRecord) -> Result<bool, StoreError>;
}

/// Append-only audit log sink.
///
/// The dispatch core always passes empty actor/target strings; both fields
/// exist for other writers of the same log.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Appends one entry. Sinks swallow their own failures; callers treat
    /// the append as infallible.
    async fn log(&self, actor: &str, target: &str, message: &str, severity: Severity);
}
