//! The state-change message published to the automation hub.

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceKind};
use crate::time::Timestamp;

/// The single fixed topic all device state messages are published on.
pub const STATE_TOPIC: &str = "homelink/device/state";

/// On/off wire state, spelled `"ON"`/`"OFF"` in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwitchState {
    On,
    Off,
}

impl From<bool> for SwitchState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl std::fmt::Display for SwitchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("ON"),
            Self::Off => f.write_str("OFF"),
        }
    }
}

/// One outbound state-change record.
///
/// Serialized to canonical JSON before transmission; the timestamp is the
/// capture time of the toggle, ISO-8601 in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMessage {
    pub room: String,
    pub device_type: DeviceKind,
    pub device_id: String,
    pub state: SwitchState,
    pub timestamp: Timestamp,
}

impl StateMessage {
    /// Capture a device's current state at the given time.
    #[must_use]
    pub fn for_device(device: &Device, at: Timestamp) -> Self {
        Self {
            room: device.room.clone(),
            device_type: device.kind,
            device_id: device.id.clone(),
            state: device.on.into(),
            timestamp: at,
        }
    }

    /// Encode as the canonical JSON payload.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails (which, for
    /// this fixed shape, it does not in practice).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
