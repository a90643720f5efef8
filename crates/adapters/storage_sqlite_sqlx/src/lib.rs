//! # homelink-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `PreferenceStore` port defined in `homelink-app`
//! - Manage the `SQLite` connection pool lifecycle
//! - Run database migrations (sqlx embedded migrations)
//! - Map typed preference values to and from stored text
//!
//! ## Dependency rule
//! Depends on `homelink-app` (for the port trait) and `homelink-domain`
//! (for error types). The `app` and `domain` crates must never reference
//! this adapter.

pub mod error;
pub mod pool;
pub mod preference_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use preference_repo::SqlitePreferenceStore;
