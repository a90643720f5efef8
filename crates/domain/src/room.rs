//! Room — a named grouping of devices.
//!
//! Room names are unique within the room list and their insertion order is
//! significant: it determines tile ordering in a host UI and is preserved
//! verbatim on persistence. The synthetic "All" aggregate some hosts render
//! is presentation-only and never stored; the domain does not special-case
//! it.

use serde::{Deserialize, Serialize};

use crate::device::RECORD_DELIMITER;
use crate::error::{HomelinkError, ValidationError};

/// A named grouping such as a kitchen or bedroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
}

impl Room {
    /// Create a room with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::Validation`] when `name` is empty or
    /// contains the record delimiter.
    pub fn validate(&self) -> Result<(), HomelinkError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyRoom.into());
        }
        if self.name.contains(RECORD_DELIMITER) {
            return Err(ValidationError::ReservedDelimiter("room").into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_plain_name() {
        assert!(Room::new("Living Room").validate().is_ok());
    }

    #[test]
    fn should_reject_empty_name() {
        let result = Room::new("").validate();
        assert!(matches!(
            result,
            Err(HomelinkError::Validation(ValidationError::EmptyRoom))
        ));
    }

    #[test]
    fn should_reject_delimiter_in_name() {
        let result = Room::new("Kitchen|Annex").validate();
        assert!(matches!(
            result,
            Err(HomelinkError::Validation(
                ValidationError::ReservedDelimiter("room")
            ))
        ));
    }
}
