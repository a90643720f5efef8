//! Registry — the in-memory device/room model.
//!
//! Single-owner, purely synchronous mutation: a host screen owns the
//! registry for its lifetime and every mutation succeeds immediately in
//! memory. Durability is the caller's concern (see the app layer's
//! registry service, which writes whole collections back after mutating).

use crate::device::{Device, DeviceKind};
use crate::error::{HomelinkError, NotFoundError, ValidationError};
use crate::room::Room;

/// In-memory collections of rooms and devices.
///
/// Room order is preserved verbatim; device order follows storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    rooms: Vec<Room>,
    devices: Vec<Device>,
}

impl Registry {
    /// Build a registry from already-loaded collections.
    #[must_use]
    pub fn new(rooms: Vec<Room>, devices: Vec<Device>) -> Self {
        Self { rooms, devices }
    }

    /// The ordered room list.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// All devices in storage order.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Look up a device by id.
    #[must_use]
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// All devices assigned to the given room, in storage order.
    #[must_use]
    pub fn devices_in_room(&self, room: &str) -> Vec<&Device> {
        self.devices.iter().filter(|d| d.room == room).collect()
    }

    /// Devices whose room no longer exists in the room list.
    ///
    /// Room deletion does not cascade, so these keep their dangling room
    /// name; hosts may surface them as an "unassigned" bucket.
    #[must_use]
    pub fn orphans(&self) -> Vec<&Device> {
        self.devices
            .iter()
            .filter(|d| !self.rooms.iter().any(|r| r.name == d.room))
            .collect()
    }

    /// Set a single device's on/off state.
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::NotFound`] when no device with `id` exists.
    pub fn set_device(&mut self, id: &str, on: bool) -> Result<&Device, HomelinkError> {
        let device = self
            .devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| NotFoundError {
                entity: "Device",
                id: id.to_string(),
            })?;
        device.on = on;
        Ok(device)
    }

    /// Set every device in `room` to the given state.
    ///
    /// Returns clones of the mutated devices in storage order; empty when
    /// no device matched.
    pub fn set_room(&mut self, room: &str, on: bool) -> Vec<Device> {
        self.devices
            .iter_mut()
            .filter(|d| d.room == room)
            .map(|d| {
                d.on = on;
                d.clone()
            })
            .collect()
    }

    /// Append a room, rejecting duplicates by name.
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::Validation`] when the room is invalid or a
    /// room with the same name exists.
    pub fn add_room(&mut self, room: Room) -> Result<(), HomelinkError> {
        room.validate()?;
        if self.rooms.iter().any(|r| r.name == room.name) {
            return Err(ValidationError::DuplicateRoom(room.name).into());
        }
        self.rooms.push(room);
        Ok(())
    }

    /// Remove a room by name. Does **not** cascade to devices referencing
    /// it. Returns whether a room was removed.
    pub fn remove_room(&mut self, name: &str) -> bool {
        let before = self.rooms.len();
        self.rooms.retain(|r| r.name != name);
        self.rooms.len() != before
    }

    /// Append a device, rejecting duplicates by id.
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::Validation`] when the device is invalid or
    /// a device with the same id exists.
    pub fn add_device(&mut self, device: Device) -> Result<(), HomelinkError> {
        device.validate()?;
        if self.devices.iter().any(|d| d.id == device.id) {
            return Err(ValidationError::DuplicateDevice(device.id).into());
        }
        self.devices.push(device);
        Ok(())
    }

    /// Remove a device by id. Returns whether a device was removed.
    pub fn remove_device(&mut self, id: &str) -> bool {
        let before = self.devices.len();
        self.devices.retain(|d| d.id != id);
        self.devices.len() != before
    }
}

/// The seed room list used when the store is empty.
#[must_use]
pub fn default_rooms() -> Vec<Room> {
    ["Living Room", "Kitchen", "Bedroom", "Bathroom", "Garage"]
        .into_iter()
        .map(Room::new)
        .collect()
}

/// The seed device list used when the store is empty. All devices start
/// off.
#[must_use]
pub fn default_devices() -> Vec<Device> {
    let seeds = [
        ("1", "Ceiling Light", "Living Room", DeviceKind::Light),
        ("2", "Kitchen Light", "Kitchen", DeviceKind::Light),
        ("3", "Ceiling Fan", "Bedroom", DeviceKind::Fan),
        ("4", "Table Fan", "Living Room", DeviceKind::Fan),
        ("5", "Door Buzzer", "Garage", DeviceKind::Buzzer),
    ];
    seeds
        .into_iter()
        .map(|(id, name, room, kind)| Device {
            id: id.to_string(),
            name: name.to_string(),
            room: room.to_string(),
            kind,
            on: false,
        })
        .collect()
}
