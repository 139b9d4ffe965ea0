//! Wiring for the notification core.
//!
//! `NotificationService` owns the provider registry, the storage
//! collaborators, the active-provider holder and the bootstrap latch, and
//! exposes the startup initializer plus the provider hot-swap entry point.
//! The builder mirrors how the rest of the monitoring service constructs
//! components: production defaults with per-collaborator overrides.

use crate::core::{AuditSink, ProviderConfigStore, SettingsStore};
use crate::dispatch::{bootstrap::bootstrap_defaults, ActiveProvider, Dispatcher};
use crate::provider::{EmptySender, MessageSender, ProviderRegistry, RegistryError};
use crate::storage::{MemoryConfigStore, MemorySettings, TracingAuditLog};
use std::sync::{Arc, Once};
use tracing::{debug, info, warn};

/// Owns the notification core and its collaborators.
pub struct NotificationService {
    registry: ProviderRegistry,
    configs: Arc<dyn ProviderConfigStore>,
    settings: Arc<dyn SettingsStore>,
    audit: Arc<dyn AuditSink>,
    active: Arc<ActiveProvider>,
    bootstrap_once: Once,
}

impl NotificationService {
    /// Creates a new `NotificationServiceBuilder` to construct a service.
    pub fn builder() -> NotificationServiceBuilder {
        NotificationServiceBuilder::new()
    }

    /// Selects and installs the active backend.
    ///
    /// Safe to call at every startup. The default-configuration bootstrap
    /// is spawned detached, at most once per service lifetime, and
    /// selection does not wait for it: when the selected provider's row
    /// does not exist yet, the no-op backend is installed and the real one
    /// takes over on the next initialization. Selection failures are
    /// safe defaults here, never errors.
    pub async fn initialize(&self) {
        self.spawn_bootstrap();

        let settings = match self.settings.notification_settings().await {
            Ok(settings) => settings,
            Err(err) => {
                debug!(%err, "notification settings unavailable, using no-op sender");
                self.install_empty();
                return;
            }
        };
        if !settings.provider_selected() {
            self.install_empty();
            return;
        }

        let record = match self.configs.find_by_name(&settings.method).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(
                    provider = %settings.method,
                    "no persisted configuration for selected provider, using no-op sender"
                );
                self.install_empty();
                return;
            }
            Err(err) => {
                warn!(provider = %settings.method, %err, "config lookup failed, using no-op sender");
                self.install_empty();
                return;
            }
        };

        match self.registry.build(&record.name, &record.addition) {
            Ok(provider) => {
                info!(provider = %record.name, "installed notification provider");
                self.active.install(provider);
            }
            Err(err) => {
                warn!(provider = %record.name, %err, "failed to construct provider, using no-op sender");
                self.install_empty();
            }
        }
    }

    /// Constructs the named backend from a configuration blob and swaps it
    /// in as the active provider.
    ///
    /// Unlike [`initialize`](Self::initialize), construction failures are
    /// surfaced: callers are configuration-editing flows that need to show
    /// them.
    pub fn load_provider(&self, name: &str, addition: &str) -> Result<(), RegistryError> {
        let provider = self.registry.build(name, addition)?;
        info!(provider = name, "installed notification provider");
        self.active.install(provider);
        Ok(())
    }

    /// Returns a dispatcher over this service's active provider.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            self.active.clone(),
            self.settings.clone(),
            self.audit.clone(),
        )
    }

    /// The currently installed backend, if any.
    pub fn current_provider(&self) -> Option<Arc<dyn MessageSender>> {
        self.active.current()
    }

    fn install_empty(&self) {
        self.active.install(Arc::new(EmptySender));
    }

    /// Spawns the default-configuration bootstrap, collapsing concurrent
    /// and repeated initializations into a single detached run.
    fn spawn_bootstrap(&self) {
        self.bootstrap_once.call_once(|| {
            let registry = self.registry;
            let store = self.configs.clone();
            tokio::spawn(async move {
                bootstrap_defaults(&registry, store.as_ref()).await;
            });
        });
    }
}

/// Builder for [`NotificationService`].
pub struct NotificationServiceBuilder {
    configs: Option<Arc<dyn ProviderConfigStore>>,
    settings: Option<Arc<dyn SettingsStore>>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl NotificationServiceBuilder {
    /// Creates a builder with no overrides.
    pub fn new() -> Self {
        Self {
            configs: None,
            settings: None,
            audit: None,
        }
    }

    /// Overrides the provider configuration store.
    pub fn config_store(mut self, store: Arc<dyn ProviderConfigStore>) -> Self {
        self.configs = Some(store);
        self
    }

    /// Overrides the settings store.
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings = Some(store);
        self
    }

    /// Overrides the audit sink.
    pub fn audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Builds the service, filling unset collaborators with in-memory
    /// defaults and a tracing-backed audit sink.
    pub fn build(self) -> NotificationService {
        NotificationService {
            registry: ProviderRegistry::new(),
            configs: self
                .configs
                .unwrap_or_else(|| Arc::new(MemoryConfigStore::new())),
            settings: self
                .settings
                .unwrap_or_else(|| Arc::new(MemorySettings::default())),
            audit: self.audit.unwrap_or_else(|| Arc::new(TracingAuditLog)),
            active: Arc::new(ActiveProvider::new()),
            bootstrap_once: Once::new(),
        }
    }
}

impl Default for NotificationServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
