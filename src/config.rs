//! Configuration management for the notification service.
//!
//! This module defines the main `Config` struct, responsible for holding
//! the service settings. It uses the `figment` crate to load configuration
//! from a `pulsenotify.toml` file and merge it with environment variables.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::NotificationSettings;

/// The main configuration struct for the service.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// The logging level for the service.
    pub log_level: String,
    /// Global notification settings (selected method, enabled flag,
    /// optional event template).
    pub notification: NotificationSettings,
    /// Optional provider configuration blobs, keyed by provider name.
    /// Rows listed here are seeded into the provider configuration store
    /// at startup, overriding the bootstrapped defaults.
    #[serde(default)]
    pub providers: BTreeMap<String, serde_json::Value>,
}

impl Config {
    /// Loads the service configuration from the specified file.
    ///
    /// # Arguments
    /// * `config_path` - The path to the TOML configuration file.
    pub fn load(config_path: &str) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // Allow overriding with environment variables, e.g.
            // PULSENOTIFY_LOG_LEVEL=debug
            .merge(Env::prefixed("PULSENOTIFY_").split("__"))
            .extract()?;
        Ok(config)
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            notification: NotificationSettings::default(),
            providers: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_select_no_provider() {
        let config = Config::default();
        assert!(!config.notification.provider_selected());
        assert!(!config.notification.enabled);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            log_level = "debug"

            [notification]
            method = "slack"
            enabled = true
            template = "{{{{event}}}}: {{{{message}}}}"

            [providers.slack]
            webhook_url = "https://hooks.example.com/T000/B000"
            "#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.notification.method, "slack");
        assert!(config.notification.enabled);
        assert_eq!(
            config.notification.template.as_deref(),
            Some("{{event}}: {{message}}")
        );
        assert_eq!(
            config.providers["slack"]["webhook_url"],
            "https://hooks.example.com/T000/B000"
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load("does-not-exist.toml").unwrap();
        assert_eq!(config.log_level, "info");
        assert!(!config.notification.provider_selected());
    }
}
