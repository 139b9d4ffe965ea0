#![allow(dead_code)]
//! Stub backends and instrumented stores shared by the integration tests.

use async_trait::async_trait;
use pulsenotify::core::{
    EventMessage, NotificationSettings, ProviderConfigStore, ProviderRecord, SettingsStore,
    StoreError,
};
use pulsenotify::dispatch::{ActiveProvider, Dispatcher};
use pulsenotify::provider::{EventSender, MessageSender, SendError};
use pulsenotify::storage::{MemoryAuditLog, MemoryConfigStore, MemorySettings};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// The error value the OneBot adapter reports for a delivered-but-
/// short-acked message.
pub fn benign_error() -> SendError {
    SendError::ShortResponse(b"\x00\x00\x00\x1a\x00\x00\x00".to_vec())
}

pub fn plain_error(msg: &str) -> SendError {
    SendError::Backend(msg.to_string())
}

/// A text-only stub backend that counts calls, records what it was asked
/// to send, and replays a scripted sequence of results. Once the script is
/// exhausted every further call succeeds.
pub struct ScriptedSender {
    text_calls: AtomicUsize,
    sent: Mutex<Vec<(String, String)>>,
    script: Mutex<VecDeque<Result<(), SendError>>>,
}

impl ScriptedSender {
    pub fn always_ok() -> Arc<Self> {
        Self::with_script(vec![])
    }

    pub fn with_script(script: Vec<Result<(), SendError>>) -> Arc<Self> {
        Arc::new(Self {
            text_calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            script: Mutex::new(script.into()),
        })
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    /// `(message, title)` pairs in the order they were received.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    fn next_result(&self) -> Result<(), SendError> {
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

#[async_trait]
impl MessageSender for ScriptedSender {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn configuration(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    async fn send_text(&self, message: &str, title: &str) -> Result<(), SendError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.sent
            .lock()
            .unwrap()
            .push((message.to_string(), title.to_string()));
        self.next_result()
    }
}

/// An event-capable stub backend: scripted results for the native event
/// path, plus call counters for both capabilities.
pub struct ScriptedEventSender {
    event_calls: AtomicUsize,
    text_calls: AtomicUsize,
    script: Mutex<VecDeque<Result<(), SendError>>>,
}

impl ScriptedEventSender {
    pub fn always_ok() -> Arc<Self> {
        Self::with_script(vec![])
    }

    pub fn with_script(script: Vec<Result<(), SendError>>) -> Arc<Self> {
        Arc::new(Self {
            event_calls: AtomicUsize::new(0),
            text_calls: AtomicUsize::new(0),
            script: Mutex::new(script.into()),
        })
    }

    pub fn event_calls(&self) -> usize {
        self.event_calls.load(Ordering::SeqCst)
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSender for ScriptedEventSender {
    fn name(&self) -> &'static str {
        "event-stub"
    }

    fn configuration(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    async fn send_text(&self, _message: &str, _title: &str) -> Result<(), SendError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn as_event_sender(&self) -> Option<&dyn EventSender> {
        Some(self)
    }
}

#[async_trait]
impl EventSender for ScriptedEventSender {
    async fn send_event(&self, _event: &EventMessage) -> Result<(), SendError> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// A settings store whose reads always fail.
pub struct FailingSettings;

#[async_trait]
impl SettingsStore for FailingSettings {
    async fn notification_settings(&self) -> Result<NotificationSettings, StoreError> {
        Err(StoreError::Unavailable("settings table gone".to_string()))
    }
}

/// Wraps a [`MemoryConfigStore`] and counts trait calls, to observe how
/// often the bootstrap task actually ran.
#[derive(Default)]
pub struct CountingConfigStore {
    pub inner: MemoryConfigStore,
    pub find_calls: AtomicUsize,
    pub insert_calls: AtomicUsize,
}

impl CountingConfigStore {
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderConfigStore for CountingConfigStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<ProviderRecord>, StoreError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_name(name).await
    }

    async fn insert_if_absent(&self, record: ProviderRecord) -> Result<bool, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_if_absent(record).await
    }
}

/// Settings with a selected method, ready to toggle.
pub fn settings(method: &str, enabled: bool, template: Option<&str>) -> Arc<MemorySettings> {
    Arc::new(MemorySettings::new(NotificationSettings {
        method: method.to_string(),
        enabled,
        template: template.map(str::to_string),
    }))
}

/// Assembles a dispatcher around an installed stub backend.
pub fn dispatcher_with(
    provider: Arc<dyn MessageSender>,
    settings: Arc<dyn SettingsStore>,
    audit: Arc<MemoryAuditLog>,
) -> Dispatcher {
    let active = Arc::new(ActiveProvider::new());
    active.install(provider);
    Dispatcher::new(active, settings, audit)
}

/// A dispatcher with an empty holder, for not-initialized checks.
pub fn uninitialized_dispatcher(audit: Arc<MemoryAuditLog>) -> Dispatcher {
    Dispatcher::new(
        Arc::new(ActiveProvider::new()),
        settings("stub", true, None),
        audit,
    )
}
