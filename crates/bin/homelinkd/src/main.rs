//! # homelinkd — headless homelink client
//!
//! Composition root that wires the adapters together and runs the core.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialize the `SQLite` pool and run migrations
//! - Construct the preference store adapter
//! - Construct exactly one `ConnectionManager` and inject it (via `Arc`)
//!   into the services
//! - Load the device/room registry (seeding defaults on first run)
//! - Resume a stored session without blocking startup
//! - Log `connected` transitions until SIGINT, then disconnect
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use homelink_adapter_mqtt::ConnectionManager;
use homelink_adapter_storage_sqlite_sqlx::{Config as DbConfig, SqlitePreferenceStore};
use homelink_app::ports::{PreferenceStore, keys};
use homelink_app::services::registry_service::RegistryService;
use homelink_app::services::session_service::SessionService;

mod config;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter =
        EnvFilter::try_new(&config.logging.filter).context("invalid logging filter directive")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Database + store adapter
    let db = DbConfig {
        database_url: config.database.url.clone(),
    }
    .build()
    .await
    .context("failed to initialize database")?;
    let store = Arc::new(SqlitePreferenceStore::new(db.pool().clone()));

    // Exactly one connection manager for the life of the process.
    let manager = Arc::new(ConnectionManager::new(&config.broker));

    // First run: the configured broker endpoint becomes the persisted one.
    if store.get_string(keys::MQTT_HOST).await?.is_none() {
        let endpoint = config.broker.endpoint();
        store.set_string(keys::MQTT_HOST, &endpoint.host).await?;
        store
            .set_int(keys::MQTT_PORT, i64::from(endpoint.port))
            .await?;
    }

    let registry_service = RegistryService::new(Arc::clone(&store));
    let registry = registry_service
        .load()
        .await
        .context("failed to load device registry")?;
    info!(
        rooms = registry.rooms().len(),
        devices = registry.devices().len(),
        "registry loaded"
    );

    let session = SessionService::new(Arc::clone(&store), Arc::clone(&manager));
    if session.resume().await? {
        info!("stored session found, reconnecting in background");
    } else {
        info!("no stored session, staying offline until login");
    }

    let mut connected = manager.subscribe_connected();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = connected.changed() => {
                if changed.is_err() {
                    break;
                }
                if *connected.borrow_and_update() {
                    info!("broker connection established");
                } else {
                    warn!("broker connection lost");
                }
            }
        }
    }

    info!("shutting down");
    manager.disconnect();
    Ok(())
}
