//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`HomelinkError`] via `From`; adapters wrap their backend errors behind
//! the `Storage` variant so the core never names a concrete driver.

/// Top-level error for the homelink core.
#[derive(Debug, thiserror::Error)]
pub enum HomelinkError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced device or room does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The persistence backend failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A device identifier was empty.
    #[error("device id must not be empty")]
    EmptyId,

    /// A display name was empty.
    #[error("name must not be empty")]
    EmptyName,

    /// A room reference was empty.
    #[error("room name must not be empty")]
    EmptyRoom,

    /// A string field contained the record delimiter `|`.
    #[error("{0} must not contain the record delimiter")]
    ReservedDelimiter(&'static str),

    /// A room with the same name already exists.
    #[error("room {0:?} already exists")]
    DuplicateRoom(String),

    /// A device with the same id already exists.
    #[error("device {0:?} already exists")]
    DuplicateDevice(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// The kind of thing looked up (`"Device"`, `"Room"`).
    pub entity: &'static str,
    /// The identifier that missed.
    pub id: String,
}

/// Outcome of a failed connection attempt.
///
/// Only these two transport outcomes cross the core boundary as
/// distinguishable signals; everything else is expressed through the
/// `connected` observable alone.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The caller-supplied timeout elapsed before the broker acknowledged.
    /// The underlying attempt is abandoned.
    #[error("connection attempt timed out")]
    Timeout,

    /// The broker refused the connection or the transport failed.
    #[error("broker connection rejected: {reason}")]
    Rejected {
        /// Human-readable transport failure description.
        reason: String,
    },
}

/// A persisted device record could not be decoded.
///
/// Never fatal: loaders skip undecodable records.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// The record did not have 4 (legacy) or 5 fields.
    #[error("expected 4 or 5 record fields, found {0}")]
    WrongFieldCount(usize),

    /// The kind field held an unrecognised value.
    #[error("unknown device kind {0:?}")]
    UnknownKind(String),

    /// The on-flag field was neither `"true"` nor `"false"`.
    #[error("invalid state flag {0:?}")]
    InvalidStateFlag(String),
}
