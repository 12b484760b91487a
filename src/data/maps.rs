//! Map catalog.
//!
//! Name → tier/layout entries for the maps the bot knows how to run.
//! Priority defaults to the tier so higher maps win ties; hosts that expose
//! user-editable priorities can layer their own ordering on top.

use once_cell::sync::Lazy;

use crate::host::ItemStack;

/// Rough layout classification, used by exploration plugins downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    Regular,
    Bossroom,
    Multilevel,
    Complex,
}

/// One catalog entry.
#[derive(Debug, Clone)]
pub struct MapEntry {
    pub name: &'static str,
    pub tier: u8,
    pub kind: MapKind,
    /// Selection priority; higher runs first. Defaults to the tier.
    pub priority: i32,
}

impl MapEntry {
    const fn new(name: &'static str, tier: u8, kind: MapKind) -> Self {
        Self {
            name,
            tier,
            kind,
            priority: tier as i32,
        }
    }
}

static CATALOG: Lazy<Vec<MapEntry>> = Lazy::new(|| {
    use MapKind::*;
    vec![
        MapEntry::new("Bone Crypt", 1, Regular),
        MapEntry::new("Shipyard", 1, Regular),
        MapEntry::new("Thicket", 1, Bossroom),
        MapEntry::new("Academy", 1, Bossroom),
        MapEntry::new("Dunes", 2, Regular),
        MapEntry::new("Volcano", 2, Bossroom),
        MapEntry::new("Toxic Sewer", 2, Regular),
        MapEntry::new("Tropical Island", 2, Multilevel),
        MapEntry::new("Strand", 3, Bossroom),
        MapEntry::new("Excavation", 3, Complex),
        MapEntry::new("Coves", 3, Regular),
        MapEntry::new("Canyon", 3, Regular),
        MapEntry::new("Cemetery", 4, Bossroom),
        MapEntry::new("Vaal Pyramid", 4, Multilevel),
        MapEntry::new("Mesa", 4, Regular),
        MapEntry::new("Silo", 4, Regular),
        MapEntry::new("Atoll", 5, Bossroom),
        MapEntry::new("Colosseum", 5, Multilevel),
        MapEntry::new("Iceberg", 5, Regular),
        MapEntry::new("Shore", 6, Regular),
        MapEntry::new("Promenade", 6, Regular),
        MapEntry::new("Lookout", 6, Bossroom),
        MapEntry::new("Cursed Crypt", 7, Regular),
        MapEntry::new("Tower", 7, Multilevel),
        MapEntry::new("City Square", 7, Regular),
        MapEntry::new("Alleyways", 8, Regular),
        MapEntry::new("Grotto", 8, Regular),
        MapEntry::new("Port", 8, Bossroom),
        MapEntry::new("Glacier", 9, Bossroom),
        MapEntry::new("Villa", 9, Multilevel),
        MapEntry::new("Cells", 10, Regular),
        MapEntry::new("Frozen Cabins", 10, Regular),
        MapEntry::new("Arcade", 11, Regular),
        MapEntry::new("Ashen Wood", 11, Regular),
        MapEntry::new("Ramparts", 11, Multilevel),
        MapEntry::new("Park", 12, Regular),
        MapEntry::new("Necropolis", 12, Bossroom),
        MapEntry::new("Chateau", 13, Regular),
        MapEntry::new("Lighthouse", 13, Regular),
        MapEntry::new("Maze", 14, Regular),
        MapEntry::new("Racecourse", 14, Multilevel),
        MapEntry::new("Plateau", 15, Bossroom),
        MapEntry::new("Arena", 15, Complex),
        MapEntry::new("Wasteland", 16, Regular),
        MapEntry::new("Beach", 16, Bossroom),
        MapEntry::new("Sanctuary", 17, Bossroom),
        MapEntry::new("Citadel", 17, Bossroom),
    ]
});

/// Look up a catalog entry by map name.
pub fn map_entry(name: &str) -> Option<&'static MapEntry> {
    CATALOG.iter().find(|m| m.name == name)
}

/// Pick the best map to run from a set of held stacks: highest catalog
/// priority wins; maps missing from the catalog rank lowest but still
/// qualify. Returns `None` when no stack is a map.
pub fn best_map(stacks: &[ItemStack]) -> Option<&ItemStack> {
    stacks
        .iter()
        .filter(|s| s.is_map())
        .max_by_key(|s| map_entry(s.id.as_str()).map(|e| e.priority).unwrap_or(i32::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ItemCategory, ItemId, SlotId};

    fn stack(name: &str, category: ItemCategory, slot: u32) -> ItemStack {
        ItemStack {
            id: ItemId::from(name),
            category,
            slot: SlotId(slot),
            size: 1,
        }
    }

    #[test]
    fn catalog_lookup() {
        let entry = map_entry("Strand").expect("Strand is in the catalog");
        assert_eq!(entry.tier, 3);
        assert!(map_entry("Nonexistent Map").is_none());
    }

    #[test]
    fn best_map_prefers_higher_priority() {
        let held = vec![
            stack("Dunes", ItemCategory::Map, 0),
            stack("Plateau", ItemCategory::Map, 1),
            stack("Breach Scarab", ItemCategory::Consumable, 2),
        ];
        let best = best_map(&held).expect("two maps held");
        assert_eq!(best.id.as_str(), "Plateau");
    }

    #[test]
    fn unknown_map_still_qualifies_when_alone() {
        let held = vec![stack("Uncharted Ruin", ItemCategory::Map, 0)];
        assert_eq!(best_map(&held).unwrap().id.as_str(), "Uncharted Ruin");
    }

    #[test]
    fn no_maps_means_none() {
        let held = vec![stack("Breach Scarab", ItemCategory::Consumable, 0)];
        assert!(best_map(&held).is_none());
    }
}
