//! Owned-card tally and load-time reconciliation
//!
//! The `cardCollection` record is
//! `{collectedCards: {name: {card, count}}, packsOpened}`. On load every entry
//! is checked against the live catalog: unknown names and non-positive or
//! non-integer counts are dropped, and the stored card body is replaced by the
//! catalog's card.

use std::collections::BTreeMap;

use fa_core::{FaError, FaResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{Card, CardCatalog};

/// A card held in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedCard {
    pub card: Card,
    /// Always at least 1
    pub count: u64,
}

/// Owned cards keyed by name, plus the number of packs opened
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCollection {
    pub collected_cards: BTreeMap<String, OwnedCard>,
    pub packs_opened: u64,
}

impl CardCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one copy of `card`
    pub fn add(&mut self, card: &Card) {
        self.collected_cards
            .entry(card.name.clone())
            .and_modify(|owned| owned.count = owned.count.saturating_add(1))
            .or_insert_with(|| OwnedCard {
                card: card.clone(),
                count: 1,
            });
    }

    /// Apply a whole pack: every card added, pack count incremented once
    pub fn apply_pack<'a>(&mut self, cards: impl IntoIterator<Item = &'a Card>) {
        for card in cards {
            self.add(card);
        }
        self.packs_opened = self.packs_opened.saturating_add(1);
    }

    pub fn count(&self, name: &str) -> u64 {
        self.collected_cards.get(name).map(|o| o.count).unwrap_or(0)
    }

    /// Distinct cards owned
    pub fn distinct(&self) -> usize {
        self.collected_cards.len()
    }

    /// Copies owned across all cards
    pub fn total_cards(&self) -> u64 {
        self.collected_cards.values().map(|o| o.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.collected_cards.is_empty() && self.packs_opened == 0
    }

    pub fn to_json(&self) -> FaResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// How a stored collection was recovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadSource {
    /// Nothing stored
    Fresh,
    /// Stored record used, possibly with dropped entries
    Restored,
    /// Stored text was not JSON
    Unreadable,
    /// JSON did not have the expected shape
    Invalid,
}

/// Collection recovered from a stored record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCollection {
    pub collection: CardCollection,
    pub source: LoadSource,
    /// Entries discarded during reconciliation
    pub dropped: usize,
    /// Advisory status for the player
    pub status: Option<String>,
}

/// Rebuild the collection from raw stored text; never fails
pub fn reconcile_collection(raw: Option<&str>, catalog: &CardCatalog) -> LoadedCollection {
    let Some(raw) = raw else {
        return LoadedCollection {
            collection: CardCollection::new(),
            source: LoadSource::Fresh,
            dropped: 0,
            status: Some("No saved collection; starting empty.".into()),
        };
    };

    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Could not read saved collection: {}", e);
            return LoadedCollection {
                collection: CardCollection::new(),
                source: LoadSource::Unreadable,
                dropped: 0,
                status: Some("Could not read saved collection; starting empty.".into()),
            };
        }
    };

    match reconcile_value(&value, catalog) {
        Ok((collection, dropped)) => {
            let status = if dropped > 0 {
                log::warn!("Dropped {} invalid collection entries", dropped);
                Some(format!(
                    "Removed {} invalid card {} from the saved collection.",
                    dropped,
                    if dropped == 1 { "entry" } else { "entries" }
                ))
            } else {
                None
            };
            LoadedCollection {
                collection,
                source: LoadSource::Restored,
                dropped,
                status,
            }
        }
        Err(e) => {
            log::warn!("{}", e);
            LoadedCollection {
                collection: CardCollection::new(),
                source: LoadSource::Invalid,
                dropped: 0,
                status: Some("Saved collection was invalid; starting empty.".into()),
            }
        }
    }
}

/// Validate a decoded record against the catalog
///
/// Returns the reconciled collection and the number of dropped entries.
pub fn reconcile_value(value: &Value, catalog: &CardCatalog) -> FaResult<(CardCollection, usize)> {
    let Some(entries) = value.get("collectedCards").and_then(Value::as_object) else {
        return Err(FaError::InvalidPersistedState(
            "collectedCards is missing or not an object".into(),
        ));
    };
    let Some(packs_opened) = value.get("packsOpened").and_then(Value::as_u64) else {
        return Err(FaError::InvalidPersistedState(
            "packsOpened is missing or not a non-negative integer".into(),
        ));
    };

    let mut collection = CardCollection {
        collected_cards: BTreeMap::new(),
        packs_opened,
    };
    let mut dropped = 0;

    for (name, entry) in entries {
        let card = catalog.get(name);
        let count = entry.get("count").and_then(Value::as_u64).filter(|&c| c >= 1);

        match (card, count) {
            (Some(card), Some(count)) => {
                collection.collected_cards.insert(
                    name.clone(),
                    OwnedCard {
                        card: card.clone(),
                        count,
                    },
                );
            }
            _ => {
                log::debug!("Dropping collection entry '{}'", name);
                dropped += 1;
            }
        }
    }

    Ok((collection, dropped))
}
