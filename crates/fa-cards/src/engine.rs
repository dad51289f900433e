//! Card Engine — pack opening and collection persistence

use std::sync::Arc;

use fa_core::{CARD_STORE_KEY, EnginePhase, FaResult, KeyValueStore, Reveal};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Card, CardCatalog};
use crate::collection::{CardCollection, LoadSource, reconcile_collection};
use crate::config::CardConfig;
use crate::dex::CardDex;
use crate::pack::{CardFace, PackResult};

/// Snapshot of everything the UI renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardStatus {
    pub packs_opened: u64,
    pub distinct_cards: usize,
    pub catalog_size: usize,
    pub total_cards: u64,
    pub phase: EnginePhase,
    /// Cards of the last settled pack
    pub last_pack: Vec<Card>,
    /// Advisory persistence message
    pub status: Option<String>,
}

/// Pack decided at `begin_open`, applied at `settle`
#[derive(Debug, Clone)]
struct PendingPack {
    pack_id: String,
    cards: Vec<Card>,
    reveal: Reveal<Vec<CardFace>>,
}

/// Card pack engine
///
/// Cards are drawn when an opening begins; the collection changes exactly
/// once when it settles.
pub struct CardEngine {
    config: CardConfig,
    catalog: Arc<CardCatalog>,
    store: Arc<dyn KeyValueStore>,
    rng: ChaCha8Rng,
    collection: CardCollection,
    phase: EnginePhase,
    pending: Option<PendingPack>,
    last_pack: Option<PackResult>,
    pack_count: u64,
    load_source: LoadSource,
    status: Option<String>,
    /// `status` currently reports a failed write
    save_failed: bool,
}

impl CardEngine {
    /// Create with the standard cards and the configured rarity weights
    pub fn new(config: CardConfig, store: Arc<dyn KeyValueStore>) -> FaResult<Self> {
        config.validate()?;
        let catalog = CardCatalog::standard_with_weights(config.rarity_weights.clone())?;
        Self::with_catalog(config, Arc::new(catalog), store)
    }

    /// Create with an explicit catalog, loading the saved collection
    pub fn with_catalog(
        config: CardConfig,
        catalog: Arc<CardCatalog>,
        store: Arc<dyn KeyValueStore>,
    ) -> FaResult<Self> {
        config.validate()?;

        let raw = match store.get(CARD_STORE_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Card store read failed: {}", e);
                None
            }
        };
        let loaded = reconcile_collection(raw.as_deref(), &catalog);

        log::info!(
            "Card collection loaded ({:?}): {} distinct cards, {} packs opened",
            loaded.source,
            loaded.collection.distinct(),
            loaded.collection.packs_opened
        );

        Ok(Self {
            config,
            catalog,
            store,
            rng: ChaCha8Rng::from_os_rng(),
            collection: loaded.collection,
            phase: EnginePhase::Idle,
            pending: None,
            last_pack: None,
            pack_count: 0,
            load_source: loaded.source,
            status: loaded.status,
            save_failed: false,
        })
    }

    /// Seed RNG for reproducible results
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed(seed);
        self
    }

    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PACK OPENING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Draw a pack and start its reveal
    ///
    /// Returns `None` while another pack is opening.
    pub fn begin_open(&mut self) -> Option<Reveal<Vec<CardFace>>> {
        if !self.phase.try_begin() {
            log::debug!("Pack ignored: engine busy");
            return None;
        }

        let cards: Vec<Card> = (0..self.config.pack_size)
            .map(|_| self.catalog.draw(&mut self.rng).clone())
            .collect();

        self.pack_count += 1;
        let pack_id = format!("pack-{:06}", self.pack_count);
        let reveal = self.config.timing.build_reveal(cards.len());

        log::debug!(
            "{} drawn: {}",
            pack_id,
            cards
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        self.pending = Some(PendingPack {
            pack_id,
            cards,
            reveal: reveal.clone(),
        });
        Some(reveal)
    }

    /// Apply the pending pack to the collection and persist
    ///
    /// Returns `None` when nothing is opening.
    pub fn settle(&mut self) -> Option<PackResult> {
        let pending = self.pending.take()?;

        let mut new_cards: Vec<String> = Vec::new();
        for card in &pending.cards {
            if self.collection.count(&card.name) == 0 && !new_cards.contains(&card.name) {
                new_cards.push(card.name.clone());
            }
        }

        self.collection.apply_pack(&pending.cards);
        self.persist();
        self.phase.settle();

        let result = PackResult {
            pack_id: pending.pack_id,
            cards: pending.cards,
            packs_opened: self.collection.packs_opened,
            new_cards,
        };

        log::debug!(
            "{} settled: best {:?}, {} new, {} packs opened",
            result.pack_id,
            result.best_rarity(),
            result.new_cards.len(),
            result.packs_opened
        );

        self.last_pack = Some(result.clone());
        Some(result)
    }

    /// Begin and settle in one call
    pub fn open_pack(&mut self) -> Option<PackResult> {
        self.begin_open()?;
        self.settle()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // RESET & STATE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Forget the saved collection
    ///
    /// Returns false (and changes nothing) while a pack is opening.
    pub fn reset_state(&mut self) -> bool {
        if self.phase.is_busy() {
            return false;
        }

        self.collection = CardCollection::new();
        self.last_pack = None;
        self.phase = EnginePhase::Idle;
        self.load_source = LoadSource::Fresh;

        self.save_failed = false;
        self.status = match self.store.delete(CARD_STORE_KEY) {
            Ok(()) => Some("Card collection cleared.".into()),
            Err(e) => {
                log::warn!("Failed to clear card collection: {}", e);
                Some(format!("Could not clear saved collection: {}", e))
            }
        };

        log::info!("Card collection reset");
        true
    }

    /// Flush the collection; a failed write becomes an advisory status
    fn persist(&mut self) {
        let result = self
            .collection
            .to_json()
            .and_then(|json| self.store.set(CARD_STORE_KEY, &json));

        match result {
            Ok(()) if self.save_failed => {
                log::info!("Card collection saved again");
                self.save_failed = false;
                self.status = None;
            }
            Ok(()) => {}
            Err(e) => {
                log::warn!("Failed to save card collection: {}", e);
                self.save_failed = true;
                self.status = Some(format!("Collection could not be saved: {}", e));
            }
        }
    }

    pub fn collection(&self) -> &CardCollection {
        &self.collection
    }

    pub fn packs_opened(&self) -> u64 {
        self.collection.packs_opened
    }

    pub fn dex(&self) -> CardDex {
        CardDex::build(&self.catalog, &self.collection)
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// Reveal of the opening pack
    pub fn pending_reveal(&self) -> Option<&Reveal<Vec<CardFace>>> {
        self.pending.as_ref().map(|p| &p.reveal)
    }

    /// Cards of the opening pack, already decided
    pub fn pending_cards(&self) -> Option<&[Card]> {
        self.pending.as_ref().map(|p| p.cards.as_slice())
    }

    pub fn last_pack(&self) -> Option<&PackResult> {
        self.last_pack.as_ref()
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Advisory persistence status
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn catalog(&self) -> &Arc<CardCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn status(&self) -> CardStatus {
        CardStatus {
            packs_opened: self.collection.packs_opened,
            distinct_cards: self.collection.distinct(),
            catalog_size: self.catalog.len(),
            total_cards: self.collection.total_cards(),
            phase: self.phase,
            last_pack: self
                .last_pack
                .as_ref()
                .map(|p| p.cards.clone())
                .unwrap_or_default(),
            status: self.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fa_core::{FaError, MemoryStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn engine() -> CardEngine {
        CardEngine::new(CardConfig::instant(), Arc::new(MemoryStore::new()))
            .unwrap()
            .with_seed(4242)
    }

    #[test]
    fn test_engine_creation() {
        let engine = engine();
        assert_eq!(engine.packs_opened(), 0);
        assert_eq!(engine.load_source(), LoadSource::Fresh);
        assert_eq!(engine.phase(), EnginePhase::Idle);
    }

    #[test]
    fn test_open_pack() {
        let mut engine = engine();
        let result = engine.open_pack().unwrap();
        assert_eq!(result.cards.len(), 5);
        assert_eq!(result.packs_opened, 1);
        assert_eq!(engine.collection().total_cards(), 5);
        assert_eq!(engine.phase(), EnginePhase::Settled);
        assert_eq!(result.pack_id, "pack-000001");
    }

    #[test]
    fn test_no_mutation_before_settle() {
        let mut engine = engine();
        engine.begin_open().unwrap();
        assert!(engine.is_busy());
        assert_eq!(engine.packs_opened(), 0);
        assert_eq!(engine.pending_cards().unwrap().len(), 5);

        assert!(engine.begin_open().is_none());
        assert!(!engine.reset_state());

        let drawn = engine.pending_cards().unwrap().to_vec();
        let result = engine.settle().unwrap();
        assert_eq!(result.cards, drawn);
        assert_eq!(engine.packs_opened(), 1);
        assert!(engine.settle().is_none());
    }

    #[test]
    fn test_new_cards_reported_once() {
        let mut engine = engine();
        let first = engine.open_pack().unwrap();
        let mut distinct: Vec<&str> = first.cards.iter().map(|c| c.name.as_str()).collect();
        distinct.sort();
        distinct.dedup();
        assert_eq!(first.new_cards.len(), distinct.len());

        let second = engine.open_pack().unwrap();
        for name in &second.new_cards {
            assert!(!first.cards.iter().any(|c| &c.name == name));
        }
    }

    #[test]
    fn test_persist_failure_sets_status() {
        let store = Arc::new(MemoryStore::with_quota(8));
        let mut engine = CardEngine::new(CardConfig::instant(), store)
            .unwrap()
            .with_seed(1);
        engine.clear_status();

        let result = engine.open_pack().unwrap();
        assert_eq!(result.packs_opened, 1);
        assert!(engine.status_message().unwrap().contains("could not be saved"));
    }

    /// Fails the first `failures` writes, then behaves like `MemoryStore`
    struct FlakyStore {
        inner: MemoryStore,
        failures: AtomicUsize,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> FaResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> FaResult<()> {
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Err(FaError::PersistenceWriteFailure("quota".into()));
            }
            self.inner.set(key, value)
        }

        fn delete(&self, key: &str) -> FaResult<()> {
            self.inner.delete(key)
        }
    }

    #[test]
    fn test_successful_save_clears_failure_status() {
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            failures: AtomicUsize::new(1),
        });
        let mut engine = CardEngine::new(CardConfig::instant(), store.clone())
            .unwrap()
            .with_seed(9);

        engine.open_pack().unwrap();
        assert!(engine.status_message().unwrap().contains("could not be saved"));

        engine.open_pack().unwrap();
        assert!(engine.status_message().is_none());
        let saved = store.get(CARD_STORE_KEY).unwrap().unwrap();
        assert!(saved.contains("\"packsOpened\":2"));
    }
}
