// SPDX-License-Identifier: MIT
//! The device workflow task.
//!
//! One consumed tick walks the whole instance through the step machine:
//! open the device panel, move residue out, load the map plus consumables
//! plus an optional fragment, activate, then wait out the portal churn and
//! step through. Every world interaction goes through the bounded step
//! executor; the first exhausted step aborts the instance to `Fatal` and
//! the tick ends without a panic.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::config::BotConfig;
use crate::data::best_map;
use crate::events::{BotEvent, MessageOutcome};
use crate::executor::{run_step, wait_for, StepOutcome, StepSpec};
use crate::host::{Host, ItemCategory, ItemId, ItemStack, SlotId};
use crate::plan::resolve_quantities;
use crate::registry::Task;
use crate::signals::Signal;
use crate::workflow::{WorkflowContext, WorkflowState};

/// Poll/timeout budget for stale portals despawning after activation.
const STALE_PORTAL_POLL: Duration = Duration::from_millis(200);
const STALE_PORTAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll/timeout budget for fresh map portals spawning.
const NEW_PORTAL_POLL: Duration = Duration::from_millis(500);
const NEW_PORTAL_TIMEOUT: Duration = Duration::from_secs(15);

pub struct OpenDeviceTask {
    config: Arc<BotConfig>,
}

impl OpenDeviceTask {
    pub fn new(config: Arc<BotConfig>) -> Self {
        Self { config }
    }

    /// Walk to the device and open its panel.
    async fn open_device(&self, host: &Host) -> StepOutcome {
        if host.device.is_open() {
            return StepOutcome::Success;
        }
        let spec = StepSpec::new("open-device").with_retry_delay(Duration::from_secs(2));
        run_step(
            &spec,
            host.errors.as_ref(),
            || {
                let device = Arc::clone(&host.device);
                async move { device.open().await }
            },
            || host.device.is_open(),
        )
        .await
    }

    /// Move any residual contents out of the device, one slot at a time.
    async fn clear_device(&self, host: &Host) -> StepOutcome {
        let residue = host.device.contents();
        if residue.is_empty() {
            return StepOutcome::Success;
        }
        warn!(stacks = residue.len(), "device is not empty — clearing");

        for stack in residue {
            let spec = StepSpec::new(format!("clear-device {}", stack.slot)).with_attempts(2);
            let slot = stack.slot;
            let outcome = run_step(
                &spec,
                host.errors.as_ref(),
                || {
                    let device = Arc::clone(&host.device);
                    async move { device.remove(slot).await }
                },
                || !host.device.contents().iter().any(|s| s.slot == slot),
            )
            .await;
            if !outcome.is_success() {
                return outcome;
            }
        }
        debug!("device cleared");
        StepOutcome::Success
    }

    /// Insert the inventory stack at `from` and confirm the device's
    /// content count grew by one.
    async fn insert_and_confirm(&self, host: &Host, from: SlotId, what: &str) -> StepOutcome {
        let old_count = host.device.contents().len();
        let spec = StepSpec::new(format!("insert {what}"));
        run_step(
            &spec,
            host.errors.as_ref(),
            || {
                let device = Arc::clone(&host.device);
                async move { device.insert(from).await }
            },
            || host.device.contents().len() == old_count + 1,
        )
        .await
    }

    /// Load the configured consumables from the inventory. Missing or
    /// stubborn items are skipped — a lighter run is still a run.
    async fn load_consumables(&self, host: &Host) {
        let requests = self.config.consumable_requests();
        if requests.is_empty() {
            debug!("no consumables selected");
            return;
        }
        let plan = resolve_quantities(&requests, &self.config.limit_table());

        info!(kinds = plan.len(), units = plan.total_remaining(), "loading consumables");
        for (id, count) in plan.entries() {
            for _ in 0..count {
                let Some(stack) = find_in_inventory(host, id) else {
                    warn!(item = %id, "not in inventory — skipping");
                    continue;
                };
                let outcome = self.insert_and_confirm(host, stack.slot, id.as_str()).await;
                if !outcome.is_success() {
                    warn!(item = %id, "failed to load — skipping");
                }
            }
        }
    }

    /// Best-effort: top the device off with one sacrifice fragment.
    async fn load_fragment(&self, host: &Host) {
        let Some(fragment) = host
            .inventory
            .find(&|s: &ItemStack| s.category == ItemCategory::Fragment)
        else {
            return;
        };
        debug!(item = %fragment.id, "loading sacrifice fragment");
        let outcome = self
            .insert_and_confirm(host, fragment.slot, fragment.id.as_str())
            .await;
        if !outcome.is_success() {
            warn!(item = %fragment.id, "failed to load fragment — continuing without");
        }
    }

    /// Consume the loaded contents. The panel closing confirms activation.
    async fn activate_device(&self, host: &Host) -> StepOutcome {
        let spec = StepSpec::new("activate-device");
        run_step(
            &spec,
            host.errors.as_ref(),
            || {
                let device = Arc::clone(&host.device);
                async move { device.activate().await }
            },
            || !host.device.is_open(),
        )
        .await
    }

    /// Wait out the portal churn: a stale portal from the previous run has
    /// to despawn (non-fatal if it lingers), then fresh map portals have
    /// to appear (fatal if they never do).
    async fn await_portals(&self, host: &Host, stale: Option<crate::host::PortalRef>) -> bool {
        if let Some(portal) = stale {
            let gone = wait_for(
                || !host.portals.is_targetable(portal),
                STALE_PORTAL_POLL,
                STALE_PORTAL_TIMEOUT,
            )
            .await;
            if !gone {
                warn!("stale portals did not despawn — continuing anyway");
            }
        }

        let spawned = wait_for(
            || host.portals.find_map_portal().is_some(),
            NEW_PORTAL_POLL,
            NEW_PORTAL_TIMEOUT,
        )
        .await;
        if !spawned {
            error!("no map portals after activating the device");
            host.errors
                .report_fatal(self.name(), "map portals never spawned");
        }
        spawned
    }

    /// Step through a spawned portal; landing in a map area confirms it.
    async fn take_portal(&self, host: &Host) -> StepOutcome {
        if host.world.is_map_area() {
            return StepOutcome::Success;
        }
        let spec = StepSpec::new("take-portal").with_retry_delay(Duration::from_secs(1));
        run_step(
            &spec,
            host.errors.as_ref(),
            || {
                let portals = Arc::clone(&host.portals);
                let world = Arc::clone(&host.world);
                async move {
                    if world.is_map_area() {
                        return Ok(());
                    }
                    match portals.find_map_portal() {
                        Some(portal) => portals.take(portal).await,
                        None => Err(crate::error::InteractError::NotTargetable),
                    }
                }
            },
            || host.world.is_map_area(),
        )
        .await
    }
}

#[async_trait]
impl Task for OpenDeviceTask {
    fn name(&self) -> &'static str {
        "open-device"
    }

    fn description(&self) -> &'static str {
        "Loads and activates the map device, then takes the spawned portal."
    }

    async fn run(&mut self, host: &Host, ctx: &mut WorkflowContext) -> bool {
        if ctx.state.is_terminal() {
            return false;
        }
        if !ctx.signals.is_set(Signal::DeviceRunPending) {
            return false;
        }
        if !host.world.is_hideout_area() {
            return false;
        }

        let held = host.inventory.items();
        let Some(map) = best_map(&held).cloned() else {
            error!("no map in inventory — disarming the device run");
            ctx.signals.clear(Signal::DeviceRunPending);
            return true;
        };
        info!(map = %map.id, instance = %ctx.instance_id, "starting device run");

        ctx.transition(WorkflowState::DeviceOpening);
        if !self.open_device(host).await.is_success() {
            ctx.transition(WorkflowState::Fatal);
            return true;
        }

        ctx.transition(WorkflowState::DeviceClearing);
        if !self.clear_device(host).await.is_success() {
            ctx.transition(WorkflowState::Fatal);
            return true;
        }

        ctx.transition(WorkflowState::ItemInserting);
        if !self
            .insert_and_confirm(host, map.slot, map.id.as_str())
            .await
            .is_success()
        {
            ctx.transition(WorkflowState::Fatal);
            return true;
        }
        if self.config.consumables.enabled {
            self.load_consumables(host).await;
        }
        self.load_fragment(host).await;

        // A portal left over from the previous run must be watched across
        // activation so the fresh one is not mistaken for it.
        let stale = host.portals.find_map_portal();

        ctx.transition(WorkflowState::Activating);
        if !self.activate_device(host).await.is_success() {
            ctx.transition(WorkflowState::Fatal);
            return true;
        }

        ctx.transition(WorkflowState::PortalWaiting);
        if !self.await_portals(host, stale).await {
            ctx.transition(WorkflowState::Fatal);
            return true;
        }
        if ctx.signals.set(Signal::RunInProgress) {
            debug!("portals open — run in progress");
        }

        ctx.transition(WorkflowState::PortalTaking);
        if !self.take_portal(host).await.is_success() {
            ctx.transition(WorkflowState::Fatal);
            return true;
        }

        info!(map = %map.id, instance = %ctx.instance_id, "portal taken");
        ctx.transition(WorkflowState::Done);
        true
    }

    fn message(&mut self, event: &BotEvent, ctx: &mut WorkflowContext) -> MessageOutcome {
        match event {
            BotEvent::NewMapEntered => {
                ctx.signals.clear(Signal::DeviceRunPending);
                MessageOutcome::Processed
            }
            _ => MessageOutcome::Unprocessed,
        }
    }
}

fn find_in_inventory(host: &Host, id: &ItemId) -> Option<ItemStack> {
    let wanted = id.clone();
    host.inventory.find(&move |s: &ItemStack| s.id == wanted)
}
