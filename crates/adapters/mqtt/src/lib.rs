//! # homelink-adapter-mqtt
//!
//! MQTT adapter — implements the `HubConnection` port over
//! [rumqttc](https://docs.rs/rumqttc).
//!
//! ## Responsibilities
//! - Maintain at most one active broker connection
//! - Drive the connect handshake with a caller-supplied timeout
//! - Keep the established connection alive from a background task
//! - Publish state messages with at-least-once assurance
//! - Own the `connected` signal and flip it only on settled states
//!
//! ## Dependency rule
//! Same as other adapters: depends on `homelink-app` and `homelink-domain`.

pub mod config;
pub mod manager;

pub use config::MqttConfig;
pub use manager::ConnectionManager;
