//! Per-consumable insertion caps.
//!
//! The device rejects more than N copies of certain consumables; the caps
//! are game data, fixed per league. Identifiers missing from the table are
//! uncapped — absence is the "unlimited" sentinel, there is no magic
//! number.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::host::ItemId;

/// Built-in caps, by item display name.
static BUILTIN_CAPS: &[(&str, u32)] = &[
    // Breach
    ("Breach Scarab", 5),
    ("Breach Scarab of the Dreamer", 1),
    ("Breach Scarab of Lordship", 1),
    ("Breach Scarab of Splintering", 2),
    ("Breach Scarab of Snares", 1),
    ("Breach Scarab of Resonant Cascade", 1),
    // Cartography
    ("Cartography Scarab of Escalation", 1),
    ("Cartography Scarab of Risk", 1),
    ("Cartography Scarab of Singularity", 1),
    ("Cartography Scarab of Corruption", 1),
    ("Cartography Scarab of the Multitude", 3),
    // Titanic
    ("Titanic Scarab", 1),
    ("Titanic Scarab of Treasures", 3),
    ("Titanic Scarab of Legend", 1),
    // Bestiary
    ("Bestiary Scarab", 1),
    ("Bestiary Scarab of the Herd", 2),
    ("Bestiary Scarab of Duplicating", 1),
    ("Bestiary Scarab of the Shadowed Crow", 1),
    // Influencing
    ("Influencing Scarab of the Shaper", 1),
    ("Influencing Scarab of the Elder", 1),
    ("Influencing Scarab of Hordes", 1),
    ("Influencing Scarab of Conversion", 1),
    // Sulphite
    ("Sulphite Scarab", 1),
    ("Sulphite Scarab of Greed", 1),
    ("Sulphite Scarab of Fumes", 1),
    // Divination
    ("Divination Scarab of The Cloister", 5),
    ("Divination Scarab of Plenty", 5),
    ("Divination Scarab of Pilfering", 1),
    // Torment
    ("Torment Scarab", 2),
    ("Torment Scarab of Peculiarity", 1),
    ("Torment Scarab of Release", 1),
    ("Torment Scarab of Possession", 3),
    // Ambush
    ("Ambush Scarab", 3),
    ("Ambush Scarab of Hidden Compartments", 1),
    ("Ambush Scarab of Potency", 1),
    ("Ambush Scarab of Containment", 1),
    ("Ambush Scarab of Discernment", 1),
    // Harbinger
    ("Harbinger Scarab", 4),
    ("Harbinger Scarab of Obelisks", 1),
    ("Harbinger Scarab of Regency", 1),
    ("Harbinger Scarab of Warhoards", 1),
    // Expedition
    ("Expedition Scarab", 1),
    ("Expedition Scarab of Runefinding", 2),
    ("Expedition Scarab of Verisium Powder", 1),
    ("Expedition Scarab of the Skald", 1),
    ("Expedition Scarab of Archaeology", 1),
    // Legion
    ("Legion Scarab", 5),
    ("Legion Scarab of Officers", 1),
    ("Legion Scarab of Command", 1),
    ("Legion Scarab of The Sekhema", 1),
    ("Legion Scarab of Eternal Conflict", 1),
    // Abyss
    ("Abyss Scarab", 2),
    ("Abyss Scarab of Multitudes", 2),
    ("Abyss Scarab of Edifice", 1),
    ("Abyss Scarab of Emptiness", 1),
    ("Abyss Scarab of Profound Depth", 1),
    // Essence
    ("Essence Scarab", 2),
    ("Essence Scarab of Ascent", 1),
    ("Essence Scarab of Stability", 1),
    ("Essence Scarab of Calcification", 2),
    ("Essence Scarab of Adaptation", 1),
    // Ritual
    ("Ritual Scarab", 1),
    ("Ritual Scarab of Selectiveness", 2),
    ("Ritual Scarab of Wisps", 1),
    ("Ritual Scarab of Abundance", 2),
    // Harvest
    ("Harvest Scarab", 1),
    ("Harvest Scarab of Doubling", 1),
    ("Harvest Scarab of Cornucopia", 1),
    // Incursion
    ("Incursion Scarab", 1),
    ("Incursion Scarab of Invasion", 3),
    ("Incursion Scarab of Champions", 2),
    ("Incursion Scarab of Timelines", 1),
    // Betrayal
    ("Betrayal Scarab", 1),
    ("Betrayal Scarab of the Allflame", 1),
    ("Betrayal Scarab of Reinforcements", 1),
    ("Betrayal Scarab of Perpetuation", 2),
    // Beyond
    ("Beyond Scarab", 1),
    ("Beyond Scarab of Corruption", 1),
    ("Beyond Scarab of Haemophilia", 2),
    ("Beyond Scarab of Resurgence", 1),
    ("Beyond Scarab of the Invasion", 1),
    // Ultimatum
    ("Ultimatum Scarab", 1),
    ("Ultimatum Scarab of Bribing", 2),
    ("Ultimatum Scarab of Dueling", 1),
    ("Ultimatum Scarab of Catalysing", 1),
    ("Ultimatum Scarab of Inscription", 1),
    // Delirium
    ("Delirium Scarab", 1),
    ("Delirium Scarab of Mania", 2),
    ("Delirium Scarab of Paranoia", 5),
    ("Delirium Scarab of Neuroses", 1),
    ("Delirium Scarab of Delusions", 1),
    // Blight
    ("Blight Scarab", 1),
    ("Blight Scarab of Bounty", 2),
    ("Blight Scarab of the Blightheart", 1),
    ("Blight Scarab of Blooming", 1),
    ("Blight Scarab of Invigoration", 1),
    // Kalguuran
    ("Kalguuran Scarab", 2),
    ("Kalguuran Scarab of Guarded Riches", 1),
    ("Kalguuran Scarab of Refinement", 1),
    // Generic
    ("Scarab of Monstrous Lineage", 2),
    ("Scarab of Adversaries", 2),
    ("Scarab of Divinity", 3),
    ("Scarab of Hunted Traitors", 1),
    ("Scarab of Stability", 1),
    ("Scarab of the Commander", 1),
    ("Scarab of Evolution", 1),
    ("Scarab of Wisps", 2),
    ("Scarab of Bisection", 1),
    ("Scarab of Unity", 1),
    ("Scarab of Radiant Storms", 1),
    // Horned
    ("Horned Scarab of Bloodlines", 1),
    ("Horned Scarab of Nemeses", 2),
    ("Horned Scarab of Preservation", 1),
    ("Horned Scarab of Awakening", 1),
    ("Horned Scarab of Tradition", 1),
    ("Horned Scarab of Glittering", 1),
    ("Horned Scarab of Pandemonium", 1),
];

static BUILTIN: Lazy<LimitTable> = Lazy::new(|| LimitTable {
    caps: BUILTIN_CAPS
        .iter()
        .map(|(name, cap)| (ItemId::from(*name), *cap))
        .collect(),
});

/// Identifier → insertion cap lookup.
#[derive(Debug, Clone, Default)]
pub struct LimitTable {
    caps: HashMap<ItemId, u32>,
}

impl LimitTable {
    /// The bundled game-data table.
    pub fn builtin() -> &'static LimitTable {
        &BUILTIN
    }

    /// Table with no caps at all — everything unlimited.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Bundled table plus configuration overrides (override wins).
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (ItemId, u32)>,
    {
        let mut caps = BUILTIN.caps.clone();
        caps.extend(overrides);
        Self { caps }
    }

    /// The cap for `id`, or `None` when uncapped.
    pub fn cap(&self, id: &ItemId) -> Option<u32> {
        self.caps.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.caps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_caps_known_entries() {
        let table = LimitTable::builtin();
        assert_eq!(table.cap(&ItemId::from("Breach Scarab")), Some(5));
        assert_eq!(table.cap(&ItemId::from("Titanic Scarab")), Some(1));
    }

    #[test]
    fn unknown_identifier_is_uncapped() {
        let table = LimitTable::builtin();
        assert_eq!(table.cap(&ItemId::from("Mirror of Kalandra")), None);
    }

    #[test]
    fn overrides_shadow_builtin_caps() {
        let table = LimitTable::with_overrides([(ItemId::from("Breach Scarab"), 2)]);
        assert_eq!(table.cap(&ItemId::from("Breach Scarab")), Some(2));
        // Untouched entries fall through to the builtin value.
        assert_eq!(table.cap(&ItemId::from("Legion Scarab")), Some(5));
    }
}
