//! The `connected` observable backed by a tokio watch channel.

use tokio::sync::watch;

/// Observable connection flag — the single source of truth for
/// connectivity.
///
/// Owned exclusively by the connection manager; every other component
/// treats it as read-only. The owner only ever calls [`set`](Self::set)
/// with settled states, so subscribers observe `true`/`false` results
/// only, never a transient in-between.
pub struct ConnectedSignal {
    sender: watch::Sender<bool>,
}

impl ConnectedSignal {
    /// Create a signal that starts disconnected.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// Record a settled state. Subscribers are only notified when the
    /// value actually changes, so repeated disconnects are quiet.
    pub fn set(&self, connected: bool) {
        self.sender.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                *current = connected;
                true
            }
        });
    }

    /// The current value.
    #[must_use]
    pub fn get(&self) -> bool {
        *self.sender.borrow()
    }

    /// Subscribe to transitions. The receiver sees the current value
    /// immediately and every change thereafter.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

impl Default for ConnectedSignal {
    fn default() -> Self {
        Self::new()
    }
}
