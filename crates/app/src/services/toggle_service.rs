//! Toggle service — turns UI toggle intents into model mutation plus an
//! outbound state message.

use tracing::{debug, warn};

use homelink_domain::device::Device;
use homelink_domain::error::HomelinkError;
use homelink_domain::message::{STATE_TOPIC, StateMessage};
use homelink_domain::registry::Registry;
use homelink_domain::time::now;

use crate::ports::{HubConnection, PreferenceStore, keys};

/// Application service translating toggle intents into mutation, publish,
/// and persistence.
///
/// The policy is optimistic fire-and-forget: the in-memory mutation always
/// succeeds and is never rolled back when the publish is dropped because
/// the connection is down. Local state reflects user intent even when the
/// hub never hears about it.
pub struct ToggleService<S, C> {
    store: S,
    connection: C,
}

impl<S: PreferenceStore, C: HubConnection> ToggleService<S, C> {
    /// Create a new service over the given store and connection.
    pub fn new(store: S, connection: C) -> Self {
        Self { store, connection }
    }

    /// Set a single device's state: mutate, publish one message, persist.
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::NotFound`] when the device id is unknown,
    /// or a storage error from the persistence write. A dropped publish is
    /// not an error.
    pub async fn set_device(
        &self,
        registry: &mut Registry,
        id: &str,
        on: bool,
    ) -> Result<(), HomelinkError> {
        let device = registry.set_device(id, on)?.clone();
        self.publish_state(&device);
        self.persist_devices(registry).await
    }

    /// Set every device in a room: mutate each, publish one message per
    /// device in stored order, persist exactly once for the whole batch.
    ///
    /// Returns the number of devices changed. A room with no devices is a
    /// no-op (no publishes, no persistence write).
    ///
    /// # Errors
    ///
    /// Returns a storage error from the persistence write.
    pub async fn set_room(
        &self,
        registry: &mut Registry,
        room: &str,
        on: bool,
    ) -> Result<usize, HomelinkError> {
        let changed = registry.set_room(room, on);
        if changed.is_empty() {
            debug!(room, "no devices in room, nothing to toggle");
            return Ok(0);
        }
        for device in &changed {
            self.publish_state(device);
        }
        self.persist_devices(registry).await?;
        Ok(changed.len())
    }

    fn publish_state(&self, device: &Device) {
        let message = StateMessage::for_device(device, now());
        match message.to_json() {
            Ok(payload) => self.connection.publish(STATE_TOPIC, payload),
            Err(err) => warn!(device = %device.id, error = %err, "failed to encode state message"),
        }
    }

    async fn persist_devices(&self, registry: &Registry) -> Result<(), HomelinkError> {
        let records: Vec<String> = registry.devices().iter().map(Device::to_record).collect();
        self.store.set_string_list(keys::DEVICES, &records).await
    }
}
