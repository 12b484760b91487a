// SPDX-License-Identifier: MIT
//! Abstract contracts for the host-provided object model.
//!
//! The bot runtime owns the real world state — areas, the player inventory,
//! the map device UI, storage tabs, portals. The orchestration core never
//! touches any of that directly; it is written purely against the traits in
//! this module, which a concrete host adapter implements. Tests drive the
//! core with in-memory fakes.
//!
//! Queries (`is_open`, `contents`, ...) are synchronous snapshots. Anything
//! that drives the game world (`open`, `take`, `activate`, ...) is async and
//! resolves once the host has issued the action — observing the *effect* of
//! an action is the caller's job, via the step executor's postcondition poll.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ActivateError, InteractError, MoveError};

// ─── Item model ──────────────────────────────────────────────────────────────

/// Stable identifier of an item definition (not an instance).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Broad classification the host derives from item metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// A map — opens an instanced area when consumed by the device.
    Map,
    /// A device consumable (scarabs and the like).
    Consumable,
    /// A sacrifice fragment.
    Fragment,
    /// Anything else.
    Other,
}

/// Position of a stack within a slotted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub u32);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One stack of items as enumerated from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub id: ItemId,
    pub category: ItemCategory,
    pub slot: SlotId,
    /// Number of units in the stack. Always ≥ 1.
    pub size: u32,
}

impl ItemStack {
    pub fn is_map(&self) -> bool {
        self.category == ItemCategory::Map
    }
}

// ─── World / inventory queries ───────────────────────────────────────────────

/// Area classifiers for wherever the player currently is.
pub trait WorldView: Send + Sync {
    fn is_combat_area(&self) -> bool;
    fn is_hideout_area(&self) -> bool;
    fn is_town_area(&self) -> bool;
    fn is_map_area(&self) -> bool;
}

/// Read access to the player inventory.
pub trait InventoryView: Send + Sync {
    /// Snapshot of all held stacks.
    fn items(&self) -> Vec<ItemStack>;

    /// First stack matching the predicate, if any.
    fn find(&self, pred: &dyn Fn(&ItemStack) -> bool) -> Option<ItemStack> {
        self.items().into_iter().find(|i| pred(i))
    }

    /// Total units held of one identifier, summed across stacks.
    fn count_of(&self, id: &ItemId) -> u32 {
        self.items()
            .iter()
            .filter(|i| &i.id == id)
            .map(|i| i.size)
            .sum()
    }
}

// ─── Device / storage control ────────────────────────────────────────────────

/// The map device: a slotted store the workflow loads and activates.
#[async_trait]
pub trait DeviceControl: Send + Sync {
    /// Walk to the device and open its UI panel.
    async fn open(&self) -> Result<(), MoveError>;

    fn is_open(&self) -> bool;

    /// Snapshot of the device's current contents.
    fn contents(&self) -> Vec<ItemStack>;

    /// Move the stack at `from` in the player inventory into the device.
    async fn insert(&self, from: SlotId) -> Result<(), MoveError>;

    /// Move the stack at `slot` out of the device back to the inventory.
    async fn remove(&self, slot: SlotId) -> Result<(), MoveError>;

    /// Consume the loaded contents and spawn portals.
    async fn activate(&self) -> Result<(), ActivateError>;
}

/// The player's storage: an ordered set of named, slotted tabs.
///
/// `tab_category` is the single source of truth for what a tab is
/// pre-classified to hold; the retrieval planner scans matching tabs first
/// and everything else after.
#[async_trait]
pub trait StorageView: Send + Sync {
    /// Walk to the storage and open its UI panel.
    async fn open(&self) -> Result<(), MoveError>;

    fn is_open(&self) -> bool;

    /// Tab names in the host's display order.
    fn tab_names(&self) -> Vec<String>;

    /// Category metadata for a tab, when the host knows one.
    fn tab_category(&self, tab: &str) -> Option<ItemCategory>;

    /// Switch the open storage panel to `tab`.
    async fn open_tab(&self, tab: &str) -> Result<(), MoveError>;

    /// Snapshot of a tab's contents. Only valid for the currently open tab.
    fn tab_contents(&self, tab: &str) -> Vec<ItemStack>;

    /// Move the whole stack at `slot` of the open tab into the inventory.
    async fn take(&self, tab: &str, slot: SlotId) -> Result<(), MoveError>;
}

// ─── Portals ─────────────────────────────────────────────────────────────────

/// Handle to a portal object in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortalRef(pub u64);

/// Query and enter portals spawned by the device.
#[async_trait]
pub trait PortalGateway: Send + Sync {
    /// Closest targetable portal that leads to a map area, if any.
    fn find_map_portal(&self) -> Option<PortalRef>;

    /// Whether a previously seen portal still exists and is targetable.
    fn is_targetable(&self, portal: PortalRef) -> bool;

    /// Click the portal and ride the area transition.
    async fn take(&self, portal: PortalRef) -> Result<(), InteractError>;
}

// ─── Error reporting ─────────────────────────────────────────────────────────

/// The host's error channel. Reporting is observational: it surfaces to the
/// host UI/log and never terminates the process.
pub trait ErrorSink: Send + Sync {
    fn report_fatal(&self, task: &str, reason: &str);
}

/// [`ErrorSink`] that forwards to the tracing log. Hosts without a dedicated
/// error panel can use this as-is.
#[derive(Debug, Default, Clone)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report_fatal(&self, task: &str, reason: &str) {
        tracing::error!(task = %task, reason = %reason, "fatal workflow error");
    }
}

// ─── Aggregate handle ────────────────────────────────────────────────────────

/// Everything the host hands the plugin at load time.
///
/// Cheaply cloneable — all fields are shared handles.
#[derive(Clone)]
pub struct Host {
    pub world: Arc<dyn WorldView>,
    pub inventory: Arc<dyn InventoryView>,
    pub device: Arc<dyn DeviceControl>,
    pub storage: Arc<dyn StorageView>,
    pub portals: Arc<dyn PortalGateway>,
    pub errors: Arc<dyn ErrorSink>,
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
