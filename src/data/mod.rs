//! Bundled in-game reference data.
//!
//! Static tables the core reads: per-consumable insertion caps and the map
//! catalog. Both ship with sane defaults and can be extended or overridden
//! from configuration — the tables are data, not behavior.

mod consumables;
mod maps;

pub use consumables::LimitTable;
pub use maps::{best_map, map_entry, MapEntry, MapKind};
