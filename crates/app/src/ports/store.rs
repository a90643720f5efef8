//! Persistent store port — durable key/value preferences.
//!
//! The backing engine offers simple typed get/set keyed by string; an
//! absent key is `None`, never an error. Writes replace the whole value
//! under a key.

use std::future::Future;

use homelink_domain::error::HomelinkError;

/// The keys the core persists, exactly as stored.
pub mod keys {
    /// Gate for the initial screen decision.
    pub const LOGGED_IN: &str = "loggedIn";
    /// Last endpoint host.
    pub const MQTT_HOST: &str = "mqttHost";
    /// Last endpoint port.
    pub const MQTT_PORT: &str = "mqttPort";
    /// Ordered room names.
    pub const ROOMS: &str = "rooms";
    /// One pipe-delimited record per device.
    pub const DEVICES: &str = "devices";
}

/// Durable key/value storage of booleans, strings, integers, and string
/// lists.
pub trait PreferenceStore {
    /// Read a boolean value.
    fn get_bool(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<bool>, HomelinkError>> + Send;

    /// Write a boolean value.
    fn set_bool(
        &self,
        key: &str,
        value: bool,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send;

    /// Read a string value.
    fn get_string(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, HomelinkError>> + Send;

    /// Write a string value.
    fn set_string(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send;

    /// Read an integer value.
    fn get_int(&self, key: &str)
    -> impl Future<Output = Result<Option<i64>, HomelinkError>> + Send;

    /// Write an integer value.
    fn set_int(
        &self,
        key: &str,
        value: i64,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send;

    /// Read an ordered string list.
    fn get_string_list(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<String>>, HomelinkError>> + Send;

    /// Write an ordered string list, replacing any previous value.
    fn set_string_list(
        &self,
        key: &str,
        values: &[String],
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send;
}

impl<T: PreferenceStore + Send + Sync> PreferenceStore for std::sync::Arc<T> {
    fn get_bool(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<bool>, HomelinkError>> + Send {
        (**self).get_bool(key)
    }

    fn set_bool(
        &self,
        key: &str,
        value: bool,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        (**self).set_bool(key, value)
    }

    fn get_string(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, HomelinkError>> + Send {
        (**self).get_string(key)
    }

    fn set_string(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        (**self).set_string(key, value)
    }

    fn get_int(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<i64>, HomelinkError>> + Send {
        (**self).get_int(key)
    }

    fn set_int(
        &self,
        key: &str,
        value: i64,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        (**self).set_int(key, value)
    }

    fn get_string_list(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<String>>, HomelinkError>> + Send {
        (**self).get_string_list(key)
    }

    fn set_string_list(
        &self,
        key: &str,
        values: &[String],
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        (**self).set_string_list(key, values)
    }
}
