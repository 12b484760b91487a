//! Plugin settings — loaded once at startup from `maprunner.toml`.
//!
//! The config store is read-only for the core: tasks read the loaded
//! snapshot, nothing writes back. Persistence and editing belong to the
//! host.
//!
//! ```toml
//! [device]
//! slots = 5
//!
//! [consumables]
//! enabled = true
//! selected = ["Breach Scarab", "Breach Scarab", "Titanic Scarab"]
//!
//! [limits]
//! "Breach Scarab" = 2
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::data::LimitTable;
use crate::host::ItemId;

/// Smallest and largest device slot counts the game offers.
const MIN_DEVICE_SLOTS: u32 = 4;
const MAX_DEVICE_SLOTS: u32 = 6;

// ─── Sections ────────────────────────────────────────────────────────────────

/// `[device]` — physical properties of the map device.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Total device slots (4–6). One slot is always reserved for the map.
    pub slots: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            slots: MIN_DEVICE_SLOTS,
        }
    }
}

impl DeviceConfig {
    /// Slots available for consumables after the map slot.
    pub fn consumable_budget(&self) -> u32 {
        self.slots.saturating_sub(1)
    }
}

/// `[consumables]` — what to load alongside the map.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsumablesConfig {
    /// Master switch. Off by default — loading consumables burns currency.
    pub enabled: bool,
    /// Ordered selection; duplicates are meaningful (one entry = one unit).
    pub selected: Vec<String>,
}

/// Root settings object.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BotConfig {
    pub device: DeviceConfig,
    pub consumables: ConsumablesConfig,
    /// Insertion-cap overrides layered over the bundled table.
    pub limits: HashMap<String, u32>,
}

// ─── Loading ─────────────────────────────────────────────────────────────────

impl BotConfig {
    /// Load and validate settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        let mut config: BotConfig =
            toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        config.validate();
        Ok(config)
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// malformed. A malformed file is logged, never fatal — the plugin
    /// starts conservatively instead of not at all.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), "failed to load settings, using defaults: {e:#}");
                Self::default()
            }
        }
    }

    fn validate(&mut self) {
        if !(MIN_DEVICE_SLOTS..=MAX_DEVICE_SLOTS).contains(&self.device.slots) {
            let clamped = self.device.slots.clamp(MIN_DEVICE_SLOTS, MAX_DEVICE_SLOTS);
            warn!(
                configured = self.device.slots,
                clamped, "device slot count out of range — clamping"
            );
            self.device.slots = clamped;
        }
    }

    // ─── Derived views ──────────────────────────────────────────────────────

    /// The bundled cap table with this config's overrides applied.
    pub fn limit_table(&self) -> LimitTable {
        LimitTable::with_overrides(
            self.limits
                .iter()
                .map(|(name, cap)| (ItemId::new(name.clone()), *cap)),
        )
    }

    /// The ordered consumable request list, truncated to the device's
    /// consumable budget (excess selections are dropped with a warning).
    pub fn consumable_requests(&self) -> Vec<ItemId> {
        let budget = self.device.consumable_budget() as usize;
        if self.consumables.selected.len() > budget {
            warn!(
                selected = self.consumables.selected.len(),
                budget, "more consumables selected than device slots — truncating"
            );
        }
        self.consumables
            .selected
            .iter()
            .take(budget)
            .map(|name| ItemId::new(name.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(toml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_config_round_trips() {
        let file = write_config(
            r#"
            [device]
            slots = 5

            [consumables]
            enabled = true
            selected = ["Breach Scarab", "Breach Scarab", "Titanic Scarab"]

            [limits]
            "Breach Scarab" = 2
            "#,
        );
        let config = BotConfig::load(file.path()).unwrap();
        assert_eq!(config.device.slots, 5);
        assert!(config.consumables.enabled);
        assert_eq!(config.consumables.selected.len(), 3);
        assert_eq!(
            config.limit_table().cap(&ItemId::from("Breach Scarab")),
            Some(2)
        );
    }

    #[test]
    fn missing_sections_use_defaults() {
        let file = write_config("");
        let config = BotConfig::load(file.path()).unwrap();
        assert_eq!(config.device.slots, 4);
        assert!(!config.consumables.enabled);
        assert!(config.consumables.selected.is_empty());
    }

    #[test]
    fn out_of_range_slots_are_clamped() {
        let file = write_config("[device]\nslots = 12\n");
        let config = BotConfig::load(file.path()).unwrap();
        assert_eq!(config.device.slots, 6);

        let file = write_config("[device]\nslots = 1\n");
        let config = BotConfig::load(file.path()).unwrap();
        assert_eq!(config.device.slots, 4);
    }

    #[test]
    fn requests_truncate_to_consumable_budget() {
        let config = BotConfig {
            device: DeviceConfig { slots: 4 },
            consumables: ConsumablesConfig {
                enabled: true,
                selected: vec![
                    "A".to_string(),
                    "B".to_string(),
                    "C".to_string(),
                    "D".to_string(),
                    "E".to_string(),
                ],
            },
            limits: HashMap::new(),
        };
        // 4 slots − 1 map slot = 3 consumables.
        let requests = config.consumable_requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0], ItemId::from("A"));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let config = BotConfig::load_or_default(Path::new("/nonexistent/maprunner.toml"));
        assert_eq!(config.device.slots, 4);
    }

    #[test]
    fn load_or_default_tolerates_malformed_file() {
        let file = write_config("this is not [valid toml");
        let config = BotConfig::load_or_default(file.path());
        assert_eq!(config.device.slots, 4);
    }
}
