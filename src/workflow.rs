// SPDX-License-Identifier: MIT
//! Per-instance workflow state.
//!
//! A workflow instance is one full device cycle: open the device, clear
//! residue, load the map and consumables, activate, take the portal. The
//! instance's entire mutable state — step position, signal bus, id — lives
//! in [`WorkflowContext`], which the scheduler passes to every task
//! invocation. Nothing is global.
//!
//! # State machine
//!
//! ```text
//! Idle ─► DeviceOpening ─► DeviceClearing ─► ItemInserting ─► Activating
//!                                                                 │
//!              Done ◄── PortalTaking ◄── PortalWaiting ◄──────────┘
//! ```
//!
//! Any step that exhausts its attempt budget transitions directly to
//! `Fatal`. `Done` and `Fatal` are terminal: every task declines to run
//! until the next qualifying `AreaChanged` begins a fresh instance.

use tracing::debug;
use uuid::Uuid;

use crate::signals::SignalBus;

/// Step position of a workflow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No run in progress.
    Idle,
    /// Walking to the device and opening its panel.
    DeviceOpening,
    /// Moving residual contents out of the device.
    DeviceClearing,
    /// Loading the map, consumables, and fragment.
    ItemInserting,
    /// Consuming the loaded contents.
    Activating,
    /// Waiting for stale portals to despawn and fresh ones to spawn.
    PortalWaiting,
    /// Entering a spawned portal.
    PortalTaking,
    /// The portal was taken — instance complete.
    Done,
    /// A step exhausted its attempt budget — instance aborted.
    Fatal,
}

impl WorkflowState {
    /// Terminal states never progress; only a new instance leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Done | WorkflowState::Fatal)
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WorkflowState::Idle => "idle",
            WorkflowState::DeviceOpening => "device_opening",
            WorkflowState::DeviceClearing => "device_clearing",
            WorkflowState::ItemInserting => "item_inserting",
            WorkflowState::Activating => "activating",
            WorkflowState::PortalWaiting => "portal_waiting",
            WorkflowState::PortalTaking => "portal_taking",
            WorkflowState::Done => "done",
            WorkflowState::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// All mutable state of one workflow instance.
#[derive(Debug)]
pub struct WorkflowContext {
    /// Identifies the instance in logs and error reports.
    pub instance_id: Uuid,
    pub state: WorkflowState,
    pub signals: SignalBus,
}

impl WorkflowContext {
    /// Fresh context in `Idle` with an empty signal bus.
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            state: WorkflowState::Idle,
            signals: SignalBus::new(),
        }
    }

    /// Abort whatever is in flight and start over: new id, all signals
    /// cleared, state back to `Idle`.
    pub fn begin_instance(&mut self) {
        self.instance_id = Uuid::new_v4();
        self.state = WorkflowState::Idle;
        self.signals.reset();
        debug!(instance = %self.instance_id, "workflow instance started");
    }

    /// Move to the next step, logging the transition.
    pub fn transition(&mut self, next: WorkflowState) {
        if self.state == next {
            return;
        }
        debug!(
            instance = %self.instance_id,
            from = %self.state,
            to = %next,
            "workflow transition"
        );
        self.state = next;
    }
}

impl Default for WorkflowContext {
    fn default() -> Self {
        Self::new()
    }
}
