//! `SQLite` implementation of the `PreferenceStore` port.
//!
//! One row per key. Booleans are stored as `"true"`/`"false"`, integers as
//! decimal strings, and string lists as JSON arrays. Reads are tolerant: a
//! value that fails to decode for the requested type reads as absent, with
//! a warning.

use std::future::Future;

use sqlx::SqlitePool;
use tracing::warn;

use homelink_app::ports::PreferenceStore;
use homelink_domain::error::HomelinkError;

use crate::error::StorageError;

const UPSERT: &str =
    "INSERT INTO preferences (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value";
const SELECT_VALUE: &str = "SELECT value FROM preferences WHERE key = ?";

/// `SQLite`-backed preference store.
pub struct SqlitePreferenceStore {
    pool: SqlitePool,
}

impl SqlitePreferenceStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn get_raw(pool: &SqlitePool, key: &str) -> Result<Option<String>, HomelinkError> {
        let row: Option<(String,)> = sqlx::query_as(SELECT_VALUE)
            .bind(key)
            .fetch_optional(pool)
            .await
            .map_err(StorageError::from)?;
        Ok(row.map(|(value,)| value))
    }

    async fn set_raw(pool: &SqlitePool, key: &str, value: String) -> Result<(), HomelinkError> {
        sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .execute(pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get_bool(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<bool>, HomelinkError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            Ok(Self::get_raw(&pool, &key).await?.and_then(|v| match v.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                other => {
                    warn!(key = %key, value = other, "stored value is not a boolean");
                    None
                }
            }))
        }
    }

    fn set_bool(
        &self,
        key: &str,
        value: bool,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move { Self::set_raw(&pool, &key, value.to_string()).await }
    }

    fn get_string(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, HomelinkError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move { Self::get_raw(&pool, &key).await }
    }

    fn set_string(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        let value = value.to_string();
        async move { Self::set_raw(&pool, &key, value).await }
    }

    fn get_int(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<i64>, HomelinkError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            Ok(Self::get_raw(&pool, &key).await?.and_then(|v| match v.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(key = %key, value = %v, "stored value is not an integer");
                    None
                }
            }))
        }
    }

    fn set_int(
        &self,
        key: &str,
        value: i64,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move { Self::set_raw(&pool, &key, value.to_string()).await }
    }

    fn get_string_list(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<String>>, HomelinkError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            Ok(Self::get_raw(&pool, &key)
                .await?
                .and_then(|v| match serde_json::from_str(&v) {
                    Ok(values) => Some(values),
                    Err(err) => {
                        warn!(key = %key, error = %err, "stored value is not a string list");
                        None
                    }
                }))
        }
    }

    fn set_string_list(
        &self,
        key: &str,
        values: &[String],
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        let encoded = serde_json::to_string(values).map_err(StorageError::from);
        async move { Self::set_raw(&pool, &key, encoded?).await }
    }
}
