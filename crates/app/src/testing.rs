//! In-memory port fakes shared by the service unit tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;

use homelink_domain::endpoint::Endpoint;
use homelink_domain::error::{ConnectError, HomelinkError};

use crate::connection_signal::ConnectedSignal;
use crate::ports::{HubConnection, PreferenceStore};

/// In-memory [`PreferenceStore`]; lists keep their insertion order.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    bools: Mutex<HashMap<String, bool>>,
    strings: Mutex<HashMap<String, String>>,
    ints: Mutex<HashMap<String, i64>>,
    lists: Mutex<HashMap<String, Vec<String>>>,
    list_writes: Mutex<usize>,
}

impl InMemoryStore {
    pub(crate) fn bool(&self, key: &str) -> Option<bool> {
        self.bools.lock().unwrap().get(key).copied()
    }

    pub(crate) fn list(&self, key: &str) -> Option<Vec<String>> {
        self.lists.lock().unwrap().get(key).cloned()
    }

    pub(crate) fn put_string(&self, key: &str, value: &str) {
        self.strings
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub(crate) fn put_int(&self, key: &str, value: i64) {
        self.ints.lock().unwrap().insert(key.to_string(), value);
    }

    pub(crate) fn put_bool(&self, key: &str, value: bool) {
        self.bools.lock().unwrap().insert(key.to_string(), value);
    }

    pub(crate) fn put_list(&self, key: &str, values: &[&str]) {
        self.lists.lock().unwrap().insert(
            key.to_string(),
            values.iter().map(ToString::to_string).collect(),
        );
    }

    /// Count of `set_string_list` calls, to assert single-persist batching.
    pub(crate) fn list_writes(&self) -> usize {
        *self.list_writes.lock().unwrap()
    }
}

impl PreferenceStore for InMemoryStore {
    fn get_bool(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<bool>, HomelinkError>> + Send {
        let value = self.bools.lock().unwrap().get(key).copied();
        async move { Ok(value) }
    }

    fn set_bool(
        &self,
        key: &str,
        value: bool,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        self.bools.lock().unwrap().insert(key.to_string(), value);
        async { Ok(()) }
    }

    fn get_string(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, HomelinkError>> + Send {
        let value = self.strings.lock().unwrap().get(key).cloned();
        async move { Ok(value) }
    }

    fn set_string(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        self.strings
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        async { Ok(()) }
    }

    fn get_int(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<i64>, HomelinkError>> + Send {
        let value = self.ints.lock().unwrap().get(key).copied();
        async move { Ok(value) }
    }

    fn set_int(
        &self,
        key: &str,
        value: i64,
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        self.ints.lock().unwrap().insert(key.to_string(), value);
        async { Ok(()) }
    }

    fn get_string_list(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<String>>, HomelinkError>> + Send {
        let value = self.lists.lock().unwrap().get(key).cloned();
        async move { Ok(value) }
    }

    fn set_string_list(
        &self,
        key: &str,
        values: &[String],
    ) -> impl Future<Output = Result<(), HomelinkError>> + Send {
        *self.list_writes.lock().unwrap() += 1;
        self.lists
            .lock()
            .unwrap()
            .insert(key.to_string(), values.to_vec());
        async { Ok(()) }
    }
}

/// Recording [`HubConnection`] fake with scriptable connect outcomes.
#[derive(Clone)]
pub(crate) struct FakeConnection {
    inner: Arc<FakeConnectionInner>,
}

pub(crate) struct FakeConnectionInner {
    signal: ConnectedSignal,
    /// `(topic, payload)` pairs in publish order.
    published: Mutex<Vec<(String, String)>>,
    connect_requests: Mutex<Vec<Endpoint>>,
    last_endpoint: Mutex<Option<Endpoint>>,
    /// Next connect outcome; `None` means accept.
    refuse_with: Mutex<Option<ConnectError>>,
}

impl FakeConnection {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(FakeConnectionInner {
                signal: ConnectedSignal::new(),
                published: Mutex::new(Vec::new()),
                connect_requests: Mutex::new(Vec::new()),
                last_endpoint: Mutex::new(None),
                refuse_with: Mutex::new(None),
            }),
        }
    }

    pub(crate) fn connected_fake() -> Self {
        let fake = Self::new();
        fake.inner.signal.set(true);
        fake
    }

    pub(crate) fn refuse_next(&self, error: ConnectError) {
        *self.inner.refuse_with.lock().unwrap() = Some(error);
    }

    pub(crate) fn published(&self) -> Vec<(String, String)> {
        self.inner.published.lock().unwrap().clone()
    }

    pub(crate) fn connect_requests(&self) -> Vec<Endpoint> {
        self.inner.connect_requests.lock().unwrap().clone()
    }
}

impl HubConnection for FakeConnection {
    fn connect(
        &self,
        endpoint: Endpoint,
        _timeout: Duration,
    ) -> impl Future<Output = Result<(), ConnectError>> + Send {
        self.inner
            .connect_requests
            .lock()
            .unwrap()
            .push(endpoint.clone());
        *self.inner.last_endpoint.lock().unwrap() = Some(endpoint);
        let outcome = self.inner.refuse_with.lock().unwrap().take();
        let result = match outcome {
            Some(err) => {
                self.inner.signal.set(false);
                Err(err)
            }
            None => {
                self.inner.signal.set(true);
                Ok(())
            }
        };
        async move { result }
    }

    fn reconnect_now(&self) -> impl Future<Output = bool> + Send {
        let remembered = self.inner.last_endpoint.lock().unwrap().clone();
        let connected = match remembered {
            Some(_) => {
                self.inner.signal.set(true);
                true
            }
            None => false,
        };
        async move { connected }
    }

    fn disconnect(&self) {
        self.inner.signal.set(false);
    }

    fn publish(&self, topic: &str, payload: String) {
        if !self.inner.signal.get() {
            return;
        }
        self.inner
            .published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
    }

    fn connected(&self) -> bool {
        self.inner.signal.get()
    }

    fn subscribe_connected(&self) -> watch::Receiver<bool> {
        self.inner.signal.subscribe()
    }

    fn last_endpoint(&self) -> Option<Endpoint> {
        self.inner.last_endpoint.lock().unwrap().clone()
    }
}
