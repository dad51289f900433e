//! Card dex: every catalog card with its owned count

use serde::{Deserialize, Serialize};

use crate::catalog::{Card, CardCatalog, Rarity};
use crate::collection::CardCollection;

/// One dex row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexEntry {
    pub card: Card,
    /// 0 when the card is missing
    pub count: u64,
}

impl DexEntry {
    pub fn is_owned(&self) -> bool {
        self.count > 0
    }
}

/// Catalog-ordered view of the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDex {
    pub entries: Vec<DexEntry>,
    pub packs_opened: u64,
}

impl CardDex {
    pub fn build(catalog: &CardCatalog, collection: &CardCollection) -> Self {
        let entries = catalog
            .cards()
            .iter()
            .map(|card| DexEntry {
                card: card.clone(),
                count: collection.count(&card.name),
            })
            .collect();

        Self {
            entries,
            packs_opened: collection.packs_opened,
        }
    }

    /// Distinct catalog cards owned
    pub fn collected(&self) -> usize {
        self.entries.iter().filter(|e| e.is_owned()).count()
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// "Collected X of Y"
    pub fn progress_label(&self) -> String {
        format!("Collected {} of {}", self.collected(), self.total())
    }

    pub fn missing(&self) -> impl Iterator<Item = &DexEntry> {
        self.entries.iter().filter(|e| !e.is_owned())
    }

    /// (owned, total) for one rarity
    pub fn rarity_progress(&self, rarity: Rarity) -> (usize, usize) {
        let tier = self.entries.iter().filter(|e| e.card.rarity == rarity);
        let total = tier.clone().count();
        let owned = tier.filter(|e| e.is_owned()).count();
        (owned, total)
    }

    pub fn is_complete(&self) -> bool {
        self.collected() == self.total()
    }
}
