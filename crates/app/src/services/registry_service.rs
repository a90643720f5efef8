//! Registry service — the device/room persistence round-trip.

use tracing::warn;

use homelink_domain::device::Device;
use homelink_domain::error::HomelinkError;
use homelink_domain::registry::{Registry, default_devices, default_rooms};
use homelink_domain::room::Room;

use crate::ports::{PreferenceStore, keys};

/// Loads, seeds, and persists the [`Registry`] over a [`PreferenceStore`].
///
/// Writes are whole-collection replacements rather than incremental
/// updates; collections stay small (tens of devices).
pub struct RegistryService<S> {
    store: S,
}

impl<S: PreferenceStore> RegistryService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the registry from the store, seeding defaults on first run.
    ///
    /// An empty or absent room list is replaced by the hardcoded default
    /// rooms, persisted immediately; likewise for devices. Device records
    /// that fail to decode are skipped with a warning — if none survive,
    /// the device list resets to the defaults.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn load(&self) -> Result<Registry, HomelinkError> {
        let rooms = match self.store.get_string_list(keys::ROOMS).await? {
            Some(names) if !names.is_empty() => names.into_iter().map(Room::new).collect(),
            _ => {
                let rooms = default_rooms();
                self.persist_rooms(&rooms).await?;
                rooms
            }
        };

        let devices: Vec<Device> = self
            .store
            .get_string_list(keys::DEVICES)
            .await?
            .unwrap_or_default()
            .iter()
            .filter_map(|record| match Device::from_record(record) {
                Ok(device) => Some(device),
                Err(err) => {
                    warn!(record = %record, error = %err, "skipping undecodable device record");
                    None
                }
            })
            .collect();
        let devices = if devices.is_empty() {
            let devices = default_devices();
            self.persist_devices(&devices).await?;
            devices
        } else {
            devices
        };

        let registry = Registry::new(rooms, devices);
        for orphan in registry.orphans() {
            warn!(
                device = %orphan.id,
                room = %orphan.room,
                "device references a room that no longer exists"
            );
        }
        Ok(registry)
    }

    /// Persist the registry's room list verbatim.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn save_rooms(&self, registry: &Registry) -> Result<(), HomelinkError> {
        self.persist_rooms(registry.rooms()).await
    }

    /// Persist the registry's device list.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn save_devices(&self, registry: &Registry) -> Result<(), HomelinkError> {
        self.persist_devices(registry.devices()).await
    }

    /// Add a room and persist the room list.
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::Validation`] for an invalid or duplicate
    /// room, or a storage error from the store.
    pub async fn add_room(
        &self,
        registry: &mut Registry,
        room: Room,
    ) -> Result<(), HomelinkError> {
        registry.add_room(room)?;
        self.save_rooms(registry).await
    }

    /// Remove a room by name and persist the room list when it changed.
    ///
    /// Devices referencing the room are left untouched (no cascade).
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn remove_room(
        &self,
        registry: &mut Registry,
        name: &str,
    ) -> Result<bool, HomelinkError> {
        let removed = registry.remove_room(name);
        if removed {
            self.save_rooms(registry).await?;
        }
        Ok(removed)
    }

    /// Add a device and persist the device list.
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::Validation`] for an invalid or duplicate
    /// device, or a storage error from the store.
    pub async fn add_device(
        &self,
        registry: &mut Registry,
        device: Device,
    ) -> Result<(), HomelinkError> {
        registry.add_device(device)?;
        self.save_devices(registry).await
    }

    /// Remove a device by id and persist the device list when it changed.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn remove_device(
        &self,
        registry: &mut Registry,
        id: &str,
    ) -> Result<bool, HomelinkError> {
        let removed = registry.remove_device(id);
        if removed {
            self.save_devices(registry).await?;
        }
        Ok(removed)
    }

    async fn persist_rooms(&self, rooms: &[Room]) -> Result<(), HomelinkError> {
        let names: Vec<String> = rooms.iter().map(|r| r.name.clone()).collect();
        self.store.set_string_list(keys::ROOMS, &names).await
    }

    async fn persist_devices(&self, devices: &[Device]) -> Result<(), HomelinkError> {
        let records: Vec<String> = devices.iter().map(Device::to_record).collect();
        self.store.set_string_list(keys::DEVICES, &records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;

    fn make_service() -> RegistryService<InMemoryStore> {
        RegistryService::new(InMemoryStore::default())
    }

    #[tokio::test]
    async fn should_seed_defaults_and_persist_them_when_store_is_empty() {
        let svc = make_service();

        let registry = svc.load().await.unwrap();

        assert_eq!(registry.rooms().len(), 5);
        assert_eq!(registry.devices().len(), 5);
        assert!(registry.devices().iter().all(|d| !d.on));
        assert_eq!(svc.store.list(keys::ROOMS).unwrap().len(), 5);
        assert_eq!(svc.store.list(keys::DEVICES).unwrap().len(), 5);
    }

    #[tokio::test]
    async fn should_load_persisted_collections_verbatim() {
        let svc = make_service();
        svc.store.put_list(keys::ROOMS, &["Studio", "Hall"]);
        svc.store.put_list(
            keys::DEVICES,
            &["9|Strip Light|Studio|light|true", "10|Vent Fan|Hall|fan|false"],
        );

        let registry = svc.load().await.unwrap();

        let rooms: Vec<&str> = registry.rooms().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(rooms, ["Studio", "Hall"]);
        assert!(registry.device("9").unwrap().on);
        assert!(!registry.device("10").unwrap().on);
    }

    #[tokio::test]
    async fn should_default_kind_when_loading_legacy_record() {
        let svc = make_service();
        svc.store.put_list(keys::ROOMS, &["Studio"]);
        svc.store
            .put_list(keys::DEVICES, &["9|Strip Light|Studio|true"]);

        let registry = svc.load().await.unwrap();

        let device = registry.device("9").unwrap();
        assert_eq!(device.kind, homelink_domain::device::DeviceKind::Light);
        assert!(device.on);
    }

    #[tokio::test]
    async fn should_skip_undecodable_records_and_keep_the_rest() {
        let svc = make_service();
        svc.store.put_list(keys::ROOMS, &["Studio"]);
        svc.store.put_list(
            keys::DEVICES,
            &["garbage", "9|Strip Light|Studio|light|true"],
        );

        let registry = svc.load().await.unwrap();

        assert_eq!(registry.devices().len(), 1);
        assert_eq!(registry.devices()[0].id, "9");
    }

    #[tokio::test]
    async fn should_reseed_devices_when_no_record_survives() {
        let svc = make_service();
        svc.store.put_list(keys::ROOMS, &["Studio"]);
        svc.store.put_list(keys::DEVICES, &["garbage", "also|bad"]);

        let registry = svc.load().await.unwrap();

        assert_eq!(registry.devices().len(), 5);
        assert_eq!(svc.store.list(keys::DEVICES).unwrap().len(), 5);
    }

    #[tokio::test]
    async fn should_roundtrip_registry_through_store() {
        let svc = make_service();
        let mut registry = svc.load().await.unwrap();
        registry.set_device("2", true).unwrap();
        svc.save_devices(&registry).await.unwrap();
        svc.save_rooms(&registry).await.unwrap();

        let reloaded = svc.load().await.unwrap();

        assert_eq!(reloaded.rooms(), registry.rooms());
        assert_eq!(reloaded.devices(), registry.devices());
    }

    #[tokio::test]
    async fn should_persist_room_list_after_add_and_remove() {
        let svc = make_service();
        let mut registry = svc.load().await.unwrap();

        svc.add_room(&mut registry, Room::new("Attic")).await.unwrap();
        assert!(svc.store.list(keys::ROOMS).unwrap().contains(&"Attic".to_string()));

        assert!(svc.remove_room(&mut registry, "Attic").await.unwrap());
        assert!(!svc.store.list(keys::ROOMS).unwrap().contains(&"Attic".to_string()));
    }

    #[tokio::test]
    async fn should_not_rewrite_store_when_removal_misses() {
        let svc = make_service();
        let mut registry = svc.load().await.unwrap();

        assert!(!svc.remove_device(&mut registry, "99").await.unwrap());
        assert_eq!(svc.store.list(keys::DEVICES).unwrap().len(), 5);
    }

    #[tokio::test]
    async fn should_keep_devices_of_removed_room_in_store() {
        let svc = make_service();
        let mut registry = svc.load().await.unwrap();

        svc.remove_room(&mut registry, "Garage").await.unwrap();

        let records = svc.store.list(keys::DEVICES).unwrap();
        assert!(records.iter().any(|r| r.contains("Garage")));
    }
}
