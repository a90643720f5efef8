//! Device — a named, room-assigned, toggleable unit (light, fan, buzzer).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HomelinkError, RecordError, ValidationError};

/// Field separator of the persisted device record.
pub const RECORD_DELIMITER: char = '|';

/// Category of a controllable unit. Affects display and the outbound
/// message payload, never connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Light,
    Fan,
    Buzzer,
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Fan => f.write_str("fan"),
            Self::Buzzer => f.write_str("buzzer"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "fan" => Ok(Self::Fan),
            "buzzer" => Ok(Self::Buzzer),
            other => Err(RecordError::UnknownKind(other.to_string())),
        }
    }
}

/// A controllable device.
///
/// The `id` is unique and stable across restarts; `room` references a
/// [`Room`](crate::room::Room) by name. The reference is not enforced
/// eagerly — see [`Registry::orphans`](crate::registry::Registry::orphans).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub room: String,
    pub kind: DeviceKind,
    pub on: bool,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::Validation`] when `id`, `name`, or `room`
    /// is empty or contains the record delimiter.
    pub fn validate(&self) -> Result<(), HomelinkError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.room.is_empty() {
            return Err(ValidationError::EmptyRoom.into());
        }
        for (field, value) in [("id", &self.id), ("name", &self.name), ("room", &self.room)] {
            if value.contains(RECORD_DELIMITER) {
                return Err(ValidationError::ReservedDelimiter(field).into());
            }
        }
        Ok(())
    }

    /// Encode into the persisted record form.
    ///
    /// Fixed field order: `id|name|room|kind|on` with the on-flag spelled
    /// `"true"`/`"false"`.
    #[must_use]
    pub fn to_record(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.id, self.name, self.room, self.kind, self.on
        )
    }

    /// Decode a persisted record.
    ///
    /// Splits positionally on `|`. A 4-field record is the legacy form
    /// without a kind; its kind defaults to [`DeviceKind::Light`].
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] for any other field count, an unrecognised
    /// kind, or an on-flag that is not `"true"`/`"false"`.
    pub fn from_record(record: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = record.split(RECORD_DELIMITER).collect();
        let (id, name, room, kind, on) = match fields.as_slice() {
            [id, name, room, kind, on] => (*id, *name, *room, kind.parse()?, *on),
            [id, name, room, on] => (*id, *name, *room, DeviceKind::Light, *on),
            other => return Err(RecordError::WrongFieldCount(other.len())),
        };
        let on = match on {
            "true" => true,
            "false" => false,
            other => return Err(RecordError::InvalidStateFlag(other.to_string())),
        };
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            room: room.to_string(),
            kind,
            on,
        })
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<String>,
    name: Option<String>,
    room: Option<String>,
    kind: DeviceKind,
    on: bool,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: DeviceKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn on(mut self, on: bool) -> Self {
        self.on = on;
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::Validation`] if any invariant fails.
    pub fn build(self) -> Result<Device, HomelinkError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            room: self.room.unwrap_or_default(),
            kind: self.kind,
            on: self.on,
        };
        device.validate()?;
        Ok(device)
    }
}
