//! PulseNotify - notification dispatch for a host-monitoring service.
//!
//! A thin CLI around the library: loads configuration, initializes the
//! active provider and fires a test notification through it.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use pulsenotify::{
    config::Config,
    core::{EventClient, EventMessage, ProviderRecord},
    service::NotificationService,
    storage::{MemoryConfigStore, MemorySettings, TracingAuditLog},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pulsenotify", about = "Notification dispatch test tool")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "pulsenotify.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a plain text message through the configured provider.
    SendText {
        /// Message title.
        #[arg(long, default_value = "PulseNotify test")]
        title: String,
        /// Message body.
        message: String,
    },
    /// Send a structured test event through the configured provider.
    SendEvent {
        /// Event name.
        #[arg(long, default_value = "test_event")]
        event: String,
        /// Event message body.
        message: String,
        /// Emoji prefix for rendered output.
        #[arg(long, default_value = "🔔")]
        emoji: String,
        /// Client names to attach, repeatable.
        #[arg(long = "client")]
        clients: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(config = %cli.config, "PulseNotify starting up");

    // =========================================================================
    // 1. Wire the collaborator stores
    // =========================================================================
    let settings = Arc::new(MemorySettings::new(config.notification.clone()));
    let config_store = Arc::new(MemoryConfigStore::new());
    for (name, blob) in &config.providers {
        config_store.upsert(ProviderRecord {
            name: name.clone(),
            addition: blob.to_string(),
        });
    }

    // =========================================================================
    // 2. Build and initialize the service
    // =========================================================================
    let service = NotificationService::builder()
        .settings_store(settings)
        .config_store(config_store)
        .audit_sink(Arc::new(TracingAuditLog))
        .build();
    service.initialize().await;

    if let Some(provider) = service.current_provider() {
        info!(provider = provider.name(), "active notification provider");
    }

    // =========================================================================
    // 3. Dispatch
    // =========================================================================
    let dispatcher = service.dispatcher();
    match cli.command {
        Command::SendText { title, message } => {
            dispatcher.send_text(&message, &title).await?;
        }
        Command::SendEvent {
            event,
            message,
            emoji,
            clients,
        } => {
            let event = EventMessage {
                event,
                message,
                emoji,
                time: Utc::now(),
                clients: clients
                    .into_iter()
                    .enumerate()
                    .map(|(i, name)| EventClient {
                        name,
                        uuid: format!("cli-{i}"),
                    })
                    .collect(),
            };
            dispatcher.send_event(&event).await?;
        }
    }

    Ok(())
}
