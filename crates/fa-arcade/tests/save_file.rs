//! Save file recovery through both engines

use std::fs;
use std::sync::Arc;

use fa_cards::{CardConfig, CardEngine};
use fa_core::{CARD_STORE_KEY, JsonFileStore, KeyValueStore, SLOT_STORE_KEY};
use fa_slot::{SlotConfig, SlotEngine};
use tempfile::TempDir;

#[test]
fn test_truncated_save_file_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("arcade.json");
    fs::write(&path, "{\"slotMachine\": \"{\\\"coins\\\":1").unwrap();

    let store = Arc::new(JsonFileStore::open(&path).unwrap());
    assert!(store.recovery_notice().is_some());
    assert!(dir.path().join("arcade.json.bak").exists());

    let slot = SlotEngine::new(SlotConfig::instant(), store.clone()).unwrap();
    assert_eq!(slot.balance(), 100);
    assert_eq!(slot.bet(), 10);

    let cards = CardEngine::new(CardConfig::instant(), store).unwrap();
    assert_eq!(cards.packs_opened(), 0);
    assert!(cards.collection().is_empty());
}

#[test]
fn test_reset_after_corrupt_save_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("arcade.json");
    fs::write(&path, "not json at all").unwrap();

    {
        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        let mut slot = SlotEngine::new(SlotConfig::instant(), store.clone())
            .unwrap()
            .with_seed(5);
        let mut cards = CardEngine::new(CardConfig::instant(), store)
            .unwrap()
            .with_seed(5);

        slot.spin(10).unwrap().unwrap();
        cards.open_pack().unwrap();
        assert!(slot.reset_state());
        assert!(cards.reset_state());
        assert_eq!(slot.balance(), 100);
        assert_eq!(cards.packs_opened(), 0);
    }

    let reopened = JsonFileStore::open(&path).unwrap();
    assert!(reopened.recovery_notice().is_none());
    assert_eq!(reopened.get(SLOT_STORE_KEY).unwrap(), None);
    assert_eq!(reopened.get(CARD_STORE_KEY).unwrap(), None);
}
