// SPDX-License-Identifier: MIT
//! Typed result codes for actions against the host-controlled world.
//!
//! Every world-mutating primitive either succeeds immediately or fails with
//! one of these codes. A code here is *transient*: the step executor retries
//! the attempt within its budget. Only an exhausted budget is fatal for the
//! workflow instance, and that escalation lives in [`crate::executor`].

/// Failure codes for moving an item between slotted stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// No item at the source slot — it despawned or was already moved.
    #[error("no item at the source slot")]
    ItemNotFound,
    /// The destination store has no free slot for the item.
    #[error("destination has no free space")]
    DestinationFull,
    /// The store's UI panel is not open.
    #[error("store is not open")]
    NotOpen,
    /// Another in-game action is still resolving.
    #[error("another action is in progress")]
    Busy,
}

/// Failure codes for activating the map device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActivateError {
    #[error("device is not open")]
    NotOpen,
    /// Nothing loaded — the device refuses to consume an empty slot set.
    #[error("device is empty")]
    Empty,
    /// The host rejected the activation (cooldown, invalid contents, ...).
    #[error("activation rejected")]
    Rejected,
    #[error("another action is in progress")]
    Busy,
}

/// Failure codes for interacting with a world object (portals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InteractError {
    /// The object is out of interaction range.
    #[error("object is out of range")]
    OutOfRange,
    /// The object exists but cannot currently be targeted.
    #[error("object is not targetable")]
    NotTargetable,
    #[error("another action is in progress")]
    Busy,
}
