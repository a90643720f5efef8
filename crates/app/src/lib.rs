//! # homelink-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PreferenceStore` — durable key/value persistence
//!   - `HubConnection` — broker connection lifecycle and publishing
//! - Define **driving/inbound ports** as use-case structs:
//!   - `RegistryService` — load/seed/persist the device/room model
//!   - `ToggleService` — turn UI toggle intents into mutation + publish
//!   - `SessionService` — login/logout and startup session resumption
//! - Provide **in-process infrastructure** (the connected signal) that
//!   doesn't need IO
//! - Orchestrate domain objects without knowing *how* persistence or the
//!   transport works
//!
//! ## Dependency rule
//! Depends on `homelink-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod connection_signal;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
