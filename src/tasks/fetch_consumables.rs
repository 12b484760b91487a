// SPDX-License-Identifier: MIT
//! Prerequisite task: fetch missing consumables from storage.
//!
//! Runs only while a device run is pending and the player is somewhere
//! with storage access (hideout or town). Computes the deficit between the
//! configured selection and the inventory, then drains storage tabs via
//! the retrieval planner. Publishes `ConsumablesFetched` when done — also
//! when there was nothing to do, so the work happens at most once per
//! workflow instance.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::BotConfig;
use crate::events::{BotEvent, MessageOutcome};
use crate::executor::{run_step, StepSpec};
use crate::host::{Host, ItemCategory};
use crate::plan::resolve_quantities;
use crate::registry::Task;
use crate::retrieval::{deficits, gather};
use crate::signals::Signal;
use crate::workflow::{WorkflowContext, WorkflowState};

/// Reset identifier handled by this task's message handler.
pub const RESET_CONSUMABLES: &str = "reset-consumables";

pub struct FetchConsumablesTask {
    config: Arc<BotConfig>,
}

impl FetchConsumablesTask {
    pub fn new(config: Arc<BotConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Task for FetchConsumablesTask {
    fn name(&self) -> &'static str {
        "fetch-consumables"
    }

    fn description(&self) -> &'static str {
        "Takes missing device consumables out of storage before a map run."
    }

    async fn run(&mut self, host: &Host, ctx: &mut WorkflowContext) -> bool {
        if !self.config.consumables.enabled {
            return false;
        }
        if ctx.state.is_terminal() {
            return false;
        }
        if !ctx.signals.is_set(Signal::DeviceRunPending) {
            return false;
        }
        if ctx.signals.is_set(Signal::ConsumablesFetched) {
            return false;
        }
        if !host.world.is_hideout_area() && !host.world.is_town_area() {
            return false;
        }

        let requests = self.config.consumable_requests();
        let desired = resolve_quantities(&requests, &self.config.limit_table());
        let missing = deficits(&desired, host.inventory.as_ref());
        if missing.is_satisfied() {
            debug!("all selected consumables already in inventory");
            ctx.signals.set(Signal::ConsumablesFetched);
            return true;
        }

        info!(
            kinds = missing.len(),
            units = missing.total_remaining(),
            "fetching consumables from storage"
        );

        let spec = StepSpec::new("open-storage");
        let opened = run_step(
            &spec,
            host.errors.as_ref(),
            || {
                let storage = Arc::clone(&host.storage);
                async move { storage.open().await }
            },
            || host.storage.is_open(),
        )
        .await;
        if !opened.is_success() {
            ctx.transition(WorkflowState::Fatal);
            return true;
        }

        let report = gather(missing, ItemCategory::Consumable, host.storage.as_ref()).await;
        if report.has_shortfall() {
            // Already logged per item by the planner; the run proceeds with
            // whatever was gathered.
            debug!(missing_kinds = report.shortfall.len(), "continuing with shortfall");
        }

        ctx.signals.set(Signal::ConsumablesFetched);
        true
    }

    fn message(&mut self, event: &BotEvent, ctx: &mut WorkflowContext) -> MessageOutcome {
        match event {
            BotEvent::NewMapEntered => {
                ctx.signals.clear(Signal::ConsumablesFetched);
                MessageOutcome::Processed
            }
            BotEvent::Reset(id) if id == RESET_CONSUMABLES => {
                ctx.signals.clear(Signal::ConsumablesFetched);
                MessageOutcome::Processed
            }
            _ => MessageOutcome::Unprocessed,
        }
    }
}
