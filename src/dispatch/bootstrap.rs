//! One-time population of default provider configuration rows.
//!
//! Runs detached from the initialization path: provider selection never
//! waits for bootstrap. A provider selected for the very first time before
//! its row exists falls back to the no-op backend until the next
//! initialization.

use crate::core::{ProviderConfigStore, ProviderRecord};
use crate::provider::ProviderRegistry;
use tracing::{debug, warn};

/// Ensures every provider kind known to the registry has a persisted
/// configuration row, inserting serialized defaults where none exist.
///
/// Idempotent: existing rows are never overwritten. A serialize or persist
/// failure for one kind is logged and skips only that kind; nothing is
/// retried and nothing reaches the caller.
pub async fn bootstrap_defaults(registry: &ProviderRegistry, store: &dyn ProviderConfigStore) {
    for name in registry.kinds() {
        match store.find_by_name(name).await {
            Ok(Some(_)) => continue,
            Ok(None) => {}
            Err(err) => {
                warn!(provider = name, %err, "config lookup failed, skipping bootstrap for kind");
                continue;
            }
        }

        let config = match registry.default_config(name) {
            Some(config) => config,
            None => {
                warn!(provider = name, "no default configuration, skipping bootstrap for kind");
                continue;
            }
        };

        let record = ProviderRecord {
            name: name.to_string(),
            addition: config.to_string(),
        };
        match store.insert_if_absent(record).await {
            Ok(true) => debug!(provider = name, "persisted default provider configuration"),
            Ok(false) => {}
            Err(err) => {
                warn!(provider = name, %err, "failed to persist default provider configuration");
            }
        }
    }
}
