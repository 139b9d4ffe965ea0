//! In-memory implementations of the storage collaborator traits.
//!
//! The monitoring service binds [`SettingsStore`], [`ProviderConfigStore`]
//! and [`AuditSink`] to its database elsewhere; these implementations back
//! the standalone binary and tests.

use crate::core::{
    AuditEntry, AuditSink, NotificationSettings, ProviderConfigStore, ProviderRecord,
    SettingsStore, Severity, StoreError,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{error, info};

/// Mutable in-memory notification settings.
#[derive(Debug, Default)]
pub struct MemorySettings {
    inner: Mutex<NotificationSettings>,
}

impl MemorySettings {
    /// Creates a store holding the given settings.
    pub fn new(settings: NotificationSettings) -> Self {
        Self {
            inner: Mutex::new(settings),
        }
    }

    /// Flips the global enabled switch.
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.lock().unwrap().enabled = enabled;
    }

    /// Replaces the selected provider name.
    pub fn set_method(&self, method: &str) {
        self.inner.lock().unwrap().method = method.to_string();
    }

    /// Replaces the event template.
    pub fn set_template(&self, template: Option<String>) {
        self.inner.lock().unwrap().template = template;
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn notification_settings(&self) -> Result<NotificationSettings, StoreError> {
        Ok(self.inner.lock().unwrap().clone())
    }
}

/// In-memory provider configuration rows keyed by provider name.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    rows: Mutex<BTreeMap<String, ProviderRecord>>,
}

impl MemoryConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a row. Used by configuration-editing flows and
    /// startup seeding; the dispatch core itself only ever inserts through
    /// [`ProviderConfigStore::insert_if_absent`].
    pub fn upsert(&self, record: ProviderRecord) {
        self.rows
            .lock()
            .unwrap()
            .insert(record.name.clone(), record);
    }

    /// Snapshot of all rows, for inspection.
    pub fn records(&self) -> Vec<ProviderRecord> {
        self.rows.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl ProviderConfigStore for MemoryConfigStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<ProviderRecord>, StoreError> {
        Ok(self.rows.lock().unwrap().get(name).cloned())
    }

    async fn insert_if_absent(&self, record: ProviderRecord) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&record.name) {
            return Ok(false);
        }
        rows.insert(record.name.clone(), record);
        Ok(true)
    }
}

/// An audit sink that keeps entries in memory, for inspection.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded entries, oldest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditLog {
    async fn log(&self, actor: &str, target: &str, message: &str, severity: Severity) {
        self.entries.lock().unwrap().push(AuditEntry {
            actor: actor.to_string(),
            target: target.to_string(),
            message: message.to_string(),
            severity,
        });
    }
}

/// An audit sink that forwards entries to the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLog;

#[async_trait]
impl AuditSink for TracingAuditLog {
    async fn log(&self, actor: &str, target: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Info => info!(actor, subject = target, "{message}"),
            Severity::Error => error!(actor, subject = target, "{message}"),
        }
    }
}
