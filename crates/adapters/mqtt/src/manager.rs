//! Broker connection manager — the single owner of the transport
//! connection and of the `connected` signal.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use homelink_app::connection_signal::ConnectedSignal;
use homelink_app::ports::HubConnection;
use homelink_domain::endpoint::Endpoint;
use homelink_domain::error::ConnectError;

use crate::config::MqttConfig;

/// Bound applied to [`reconnect_now`](ConnectionManager::reconnect_now)
/// attempts.
pub const RECONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Request-channel capacity of the underlying client.
const CHANNEL_CAPACITY: usize = 100;

/// Owns the rumqttc client, the background event-loop task, and the
/// remembered endpoint.
///
/// Exactly one instance exists per process; the constructor is the only
/// way to get one and the composition root constructs it once. Callers
/// must not overlap `connect`/`reconnect_now` invocations.
pub struct ConnectionManager {
    signal: Arc<ConnectedSignal>,
    keep_alive: Duration,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    client: Option<AsyncClient>,
    event_task: Option<JoinHandle<()>>,
    last_endpoint: Option<Endpoint>,
}

impl ConnectionManager {
    /// Create a manager in the `Idle` state (disconnected, no remembered
    /// endpoint).
    #[must_use]
    pub fn new(config: &MqttConfig) -> Self {
        Self {
            signal: Arc::new(ConnectedSignal::new()),
            keep_alive: Duration::from_secs(u64::from(config.keep_alive_secs)),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Connect to `endpoint`, waiting at most `timeout` for the broker
    /// acknowledgment.
    ///
    /// The requested endpoint is remembered before the attempt regardless
    /// of outcome, so later reconnects target the most recently
    /// *requested* endpoint, not just the most recently successful one.
    /// Any previous connection is torn down first.
    ///
    /// # Errors
    ///
    /// [`ConnectError::Timeout`] when `timeout` elapses before the
    /// acknowledgment (the attempt is abandoned);
    /// [`ConnectError::Rejected`] when the transport fails or the broker
    /// refuses. Either way `connected()` reads `false` afterwards.
    pub async fn connect(
        &self,
        endpoint: Endpoint,
        timeout: Duration,
    ) -> Result<(), ConnectError> {
        self.teardown();
        self.inner.lock().unwrap().last_endpoint = Some(endpoint.clone());

        let target = endpoint.or_default();
        let mut options = MqttOptions::new(client_id(), target.host.clone(), target.port);
        options.set_keep_alive(self.keep_alive);
        let (client, mut event_loop) = AsyncClient::new(options, CHANNEL_CAPACITY);

        debug!(endpoint = %target, "connecting to broker");
        match tokio::time::timeout(timeout, await_handshake(&mut event_loop)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                debug!(endpoint = %target, error = %err, "broker connection rejected");
                return Err(err);
            }
            Err(_elapsed) => {
                // Dropping the event loop abandons the in-flight attempt.
                debug!(endpoint = %target, "broker connection timed out");
                return Err(ConnectError::Timeout);
            }
        }

        let task = spawn_event_task(event_loop, Arc::clone(&self.signal));
        {
            let mut inner = self.inner.lock().unwrap();
            inner.client = Some(client);
            inner.event_task = Some(task);
        }
        self.signal.set(true);
        info!(endpoint = %target, "connected to broker");
        Ok(())
    }

    /// Re-attempt the last remembered endpoint with a fixed 5-second
    /// bound.
    ///
    /// Returns the post-attempt value of `connected`; returns `false`
    /// without attempting when no endpoint is remembered.
    pub async fn reconnect_now(&self) -> bool {
        let Some(endpoint) = self.last_endpoint() else {
            debug!("reconnect requested with no remembered endpoint");
            return false;
        };
        if let Err(err) = self.connect(endpoint, RECONNECT_TIMEOUT).await {
            warn!(error = %err, "manual reconnect failed");
        }
        self.connected()
    }

    /// Publish `payload` on `topic` with at-least-once assurance.
    ///
    /// Synchronous and non-blocking. While disconnected this is a silent
    /// no-op — the message is dropped, never queued, and no error is
    /// raised.
    pub fn publish(&self, topic: &str, payload: String) {
        if !self.signal.get() {
            debug!(topic, "publish dropped while disconnected");
            return;
        }
        let client = self.inner.lock().unwrap().client.clone();
        let Some(client) = client else {
            debug!(topic, "publish dropped during teardown");
            return;
        };
        if let Err(err) = client.try_publish(topic, QoS::AtLeastOnce, false, payload) {
            warn!(topic, error = %err, "publish dropped");
        }
    }

    /// Tear the connection down. Idempotent; transport errors during
    /// teardown are suppressed and the end state is always
    /// `connected() == false`.
    pub fn disconnect(&self) {
        self.teardown();
    }

    /// Current settled connection state.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.signal.get()
    }

    /// Subscribe to settled connection-state transitions.
    #[must_use]
    pub fn subscribe_connected(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }

    /// The endpoint a reconnect would target.
    #[must_use]
    pub fn last_endpoint(&self) -> Option<Endpoint> {
        self.inner.lock().unwrap().last_endpoint.clone()
    }

    fn teardown(&self) {
        let (client, task) = {
            let mut inner = self.inner.lock().unwrap();
            (inner.client.take(), inner.event_task.take())
        };
        if let Some(task) = task {
            task.abort();
        }
        if let Some(client) = client {
            // The event loop is already gone, so this usually fails with a
            // closed request channel; the socket itself dies with the loop.
            if let Err(err) = client.try_disconnect() {
                debug!(error = %err, "transport teardown error suppressed");
            }
        }
        self.signal.set(false);
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Drive the event loop until the broker acknowledges or the transport
/// fails. rumqttc retries internally when polling continues after an
/// error, so the first failure is returned instead of polled past —
/// reconnection stays manual.
async fn await_handshake(event_loop: &mut EventLoop) -> Result<(), ConnectError> {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code == ConnectReturnCode::Success {
                    return Ok(());
                }
                return Err(ConnectError::Rejected {
                    reason: format!("{:?}", ack.code),
                });
            }
            Ok(_) => {}
            Err(err) => {
                return Err(ConnectError::Rejected {
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Keep the established connection alive. Exits on the first transport
/// error, settling the signal to disconnected — there is no automatic
/// retry loop.
fn spawn_event_task(mut event_loop: EventLoop, signal: Arc<ConnectedSignal>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match event_loop.poll().await {
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "broker connection lost");
                    signal.set(false);
                    break;
                }
            }
        }
    })
}

/// Per-attempt client identity: monotonic timestamp plus a random suffix
/// so that rapid consecutive reconnects cannot collide on the broker.
fn client_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("homelink-{millis}-{}", &suffix[..8])
}

impl HubConnection for ConnectionManager {
    fn connect(
        &self,
        endpoint: Endpoint,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<(), ConnectError>> + Send {
        self.connect(endpoint, timeout)
    }

    fn reconnect_now(&self) -> impl std::future::Future<Output = bool> + Send {
        self.reconnect_now()
    }

    fn disconnect(&self) {
        self.disconnect();
    }

    fn publish(&self, topic: &str, payload: String) {
        self.publish(topic, payload);
    }

    fn connected(&self) -> bool {
        self.connected()
    }

    fn subscribe_connected(&self) -> watch::Receiver<bool> {
        self.subscribe_connected()
    }

    fn last_endpoint(&self) -> Option<Endpoint> {
        self.last_endpoint()
    }
}
