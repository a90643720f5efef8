//! # homelink-domain
//!
//! Pure domain model for the homelink smart-home control client.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Devices** (named, room-assigned, toggleable units)
//! - Define **Rooms** (ordered, uniquely-named groupings)
//! - Define the **Registry** (the in-memory device/room model)
//! - Define the **StateMessage** published to the automation hub
//! - Define the **Endpoint** value object for broker addresses
//! - Contain all invariant enforcement and the persistence record codec
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod device;
pub mod endpoint;
pub mod message;
pub mod registry;
pub mod room;
