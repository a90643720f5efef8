//! Connection port — the broker connection manager contract.
//!
//! Exactly one implementation instance exists per process; it is injected
//! into the services that need it (shared via `Arc`), which keeps the
//! "one active connection" invariant a matter of construction rather than
//! hidden global state.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

use homelink_domain::endpoint::Endpoint;
use homelink_domain::error::ConnectError;

/// Owns the transport connection lifecycle and outbound publishing.
///
/// Callers must not overlap `connect`/`reconnect_now` invocations; the
/// manager does not serialise concurrent attempts itself.
pub trait HubConnection {
    /// Connect to `endpoint`, waiting at most `timeout` for the broker
    /// acknowledgment.
    ///
    /// The requested endpoint is remembered *before* the attempt, whatever
    /// its outcome, so a later [`reconnect_now`](Self::reconnect_now)
    /// targets the most recently requested endpoint.
    ///
    /// # Errors
    ///
    /// [`ConnectError::Timeout`] when `timeout` elapses first (the attempt
    /// is abandoned); [`ConnectError::Rejected`] when the transport fails
    /// or the broker refuses. Either way the caller observes
    /// `connected() == false` afterwards.
    fn connect(
        &self,
        endpoint: Endpoint,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), ConnectError>> + Send;

    /// Re-attempt the last remembered endpoint with a fixed 5-second
    /// bound. Returns the post-attempt value of `connected`; returns
    /// `false` without attempting when no endpoint is remembered.
    fn reconnect_now(&self) -> impl Future<Output = bool> + Send;

    /// Tear the connection down. Synchronous, idempotent, and quiet:
    /// transport errors during teardown are suppressed and the end state
    /// is always `connected() == false`.
    fn disconnect(&self);

    /// Publish `payload` on `topic` with at-least-once assurance.
    ///
    /// Synchronous and non-blocking. A publish while disconnected is
    /// silently dropped — never queued, never an error.
    fn publish(&self, topic: &str, payload: String);

    /// Current settled connection state.
    fn connected(&self) -> bool;

    /// Subscribe to settled connection-state transitions.
    fn subscribe_connected(&self) -> watch::Receiver<bool>;

    /// The endpoint a [`reconnect_now`](Self::reconnect_now) would target.
    fn last_endpoint(&self) -> Option<Endpoint>;
}

impl<T: HubConnection + Send + Sync> HubConnection for std::sync::Arc<T> {
    fn connect(
        &self,
        endpoint: Endpoint,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), ConnectError>> + Send {
        (**self).connect(endpoint, timeout)
    }

    fn reconnect_now(&self) -> impl Future<Output = bool> + Send {
        (**self).reconnect_now()
    }

    fn disconnect(&self) {
        (**self).disconnect();
    }

    fn publish(&self, topic: &str, payload: String) {
        (**self).publish(topic, payload);
    }

    fn connected(&self) -> bool {
        (**self).connected()
    }

    fn subscribe_connected(&self) -> watch::Receiver<bool> {
        (**self).subscribe_connected()
    }

    fn last_endpoint(&self) -> Option<Endpoint> {
        (**self).last_endpoint()
    }
}
