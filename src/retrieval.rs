// SPDX-License-Identifier: MIT
//! Retrieval planning — satisfy a plan's deficits from storage.
//!
//! Two stages. [`deficits`] subtracts what the inventory already holds
//! (`max(0, desired − held)` per identifier, zero entries dropped).
//! [`gather`] then drains storage tabs: tabs pre-classified for the wanted
//! category are scanned first, every other tab after, and the scan stops
//! as soon as all deficits reach zero. Per matching stack it credits
//! `min(deficit, stack size)`; a stack smaller than the deficit just
//! continues the scan.
//!
//! Retrieval never hard-fails: a tab that refuses to open is skipped, and
//! a residual deficit after every tab has been scanned is a logged
//! shortfall — the workflow proceeds with whatever was gathered.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::host::{InventoryView, ItemCategory, ItemId, StorageView};
use crate::plan::Plan;

/// What a gather pass accomplished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatherReport {
    /// Units credited per identifier.
    pub taken: BTreeMap<ItemId, u32>,
    /// Deficits left unsatisfied after scanning every tab.
    pub shortfall: BTreeMap<ItemId, u32>,
}

impl GatherReport {
    pub fn total_taken(&self) -> u32 {
        self.taken.values().sum()
    }

    pub fn has_shortfall(&self) -> bool {
        !self.shortfall.is_empty()
    }
}

/// Reduce a desired plan to what is actually missing from the inventory.
pub fn deficits(desired: &Plan, inventory: &dyn InventoryView) -> Plan {
    let mut counts: BTreeMap<ItemId, u32> = BTreeMap::new();
    for (id, want) in desired.entries() {
        let held = inventory.count_of(id);
        let deficit = want.saturating_sub(held);
        if deficit > 0 {
            counts.insert(id.clone(), deficit);
        } else {
            debug!(item = %id, held, want, "already holding enough");
        }
    }
    Plan::from_counts(counts)
}

/// Drain storage tabs until `plan` is satisfied or every tab was scanned.
///
/// The storage panel must already be open; switching between tabs is this
/// function's job. `category` drives the scan order only — items are
/// matched by identifier, never by tab.
pub async fn gather(
    mut plan: Plan,
    category: ItemCategory,
    storage: &dyn StorageView,
) -> GatherReport {
    let mut report = GatherReport::default();
    if plan.is_satisfied() {
        return report;
    }

    for tab in ordered_tabs(storage, category) {
        if plan.is_satisfied() {
            break;
        }
        if let Err(code) = storage.open_tab(&tab).await {
            warn!(tab = %tab, code = %code, "failed to open storage tab — skipping");
            continue;
        }

        for stack in storage.tab_contents(&tab) {
            let need = plan.remaining(&stack.id);
            if need == 0 {
                continue;
            }
            match storage.take(&tab, stack.slot).await {
                Ok(()) => {
                    let credited = need.min(stack.size);
                    plan.fulfill(&stack.id, credited);
                    *report.taken.entry(stack.id.clone()).or_insert(0) += credited;
                    info!(
                        item = %stack.id,
                        tab = %tab,
                        stack = stack.size,
                        credited,
                        "took stack from storage"
                    );
                }
                Err(code) => {
                    warn!(item = %stack.id, tab = %tab, code = %code, "failed to take stack");
                }
            }
            if plan.is_satisfied() {
                break;
            }
        }
    }

    for (id, left) in plan.entries() {
        warn!(item = %id, missing = left, "shortfall — storage exhausted");
        report.shortfall.insert(id.clone(), left);
    }
    report
}

/// Tab scan order: category-classified tabs first (host order preserved
/// within each group), then everything else.
fn ordered_tabs(storage: &dyn StorageView, category: ItemCategory) -> Vec<String> {
    let names = storage.tab_names();
    let (classified, rest): (Vec<_>, Vec<_>) = names
        .into_iter()
        .partition(|t| storage.tab_category(t) == Some(category));
    classified.into_iter().chain(rest).collect()
}
