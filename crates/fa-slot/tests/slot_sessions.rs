//! Multi-step slot sessions across stores, days and restarts

use std::sync::Arc;

use fa_core::{FixedClock, JsonFileStore, KeyValueStore, MemoryStore, SLOT_STORE_KEY};
use fa_slot::*;
use tempfile::TempDir;

const DISCORD: u32 = 0;
const GITHUB: u32 = 1;
const CLUB: u32 = 4;
const HEART: u32 = 6;
const WILD: u32 = 8;

fn build(store: Arc<dyn KeyValueStore>, clock: Arc<FixedClock>) -> SlotEngine {
    SlotEngine::with_parts(
        SlotConfig::instant(),
        Arc::new(SymbolCatalog::standard().unwrap()),
        store,
        clock,
    )
    .unwrap()
    .with_seed(2024)
}

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::from_ymd(2025, 12, 31).unwrap())
}

#[test]
fn test_example_scenario_one_row() {
    let mut engine = build(Arc::new(MemoryStore::new()), clock());
    let grid = Grid::new([
        [DISCORD, DISCORD, DISCORD],
        [GITHUB, CLUB, HEART],
        [CLUB, HEART, GITHUB],
    ]);

    let reveal = engine.begin_spin_with_grid(10, grid).unwrap().unwrap();
    assert_eq!(reveal.last().unwrap().snapshot, grid);
    assert_eq!(engine.balance(), 90);

    let result = engine.settle().unwrap().unwrap();
    assert_eq!(result.match_count, 1);
    assert_eq!(engine.balance(), 170);
}

#[test]
fn test_all_wild_board_pays_nothing() {
    let mut engine = build(Arc::new(MemoryStore::new()), clock());
    let result = engine
        .spin_forced(10, Grid::new([[WILD; 3]; 3]))
        .unwrap()
        .unwrap();

    assert_eq!(result.match_count, 0);
    assert_eq!(result.reward, 0);
    assert_eq!(result.outcome, SpinOutcome::NoWin);
    assert_eq!(engine.balance(), 90);
}

#[test]
fn test_jackpot_scales_with_bet() {
    let mut engine = build(Arc::new(MemoryStore::new()), clock());
    let result = engine
        .spin_forced(20, Grid::new([[HEART; 3]; 3]))
        .unwrap()
        .unwrap();

    assert!(result.jackpot);
    assert_eq!(result.outcome, SpinOutcome::Jackpot);
    assert_eq!(result.reward, 980);
    assert_eq!(result.coin_delta, 1960);
    assert_eq!(engine.balance(), 80 + 1960);
}

#[test]
fn test_balance_never_negative_over_many_spins() {
    let mut engine = build(Arc::new(MemoryStore::new()), clock());

    for _ in 0..500 {
        let bet = engine.bet();
        if bet > engine.balance() {
            assert!(engine.spin(bet).is_err());
            break;
        }
        let before = engine.balance();
        let result = engine.spin(bet).unwrap().unwrap();
        assert_eq!(result.balance_after, before - bet + result.coin_delta);
        assert!(engine.bet() >= engine.config().min_bet);
    }
}

#[test]
fn test_daily_claim_once_per_day() {
    let clock = clock();
    let mut engine = build(Arc::new(MemoryStore::new()), clock.clone());

    assert_eq!(engine.claim_status(), ClaimStatus::Available);
    assert_eq!(
        engine.claim_daily(),
        ClaimOutcome::Credited {
            amount: 50,
            balance: 150
        }
    );
    assert_eq!(engine.claim_daily(), ClaimOutcome::AlreadyClaimed);
    assert_eq!(engine.balance(), 150);
    assert_eq!(engine.claim_status(), ClaimStatus::Claimed);

    // Year rollover re-opens the bonus
    clock.advance_days(1);
    assert_eq!(engine.claim_status(), ClaimStatus::Available);
    assert!(engine.claim_daily().is_credited());
    assert_eq!(engine.balance(), 200);
}

#[test]
fn test_claim_survives_restart() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = clock();

    {
        let mut engine = build(store.clone(), clock.clone());
        engine.claim_daily();
        engine.adjust_bet(20);
    }

    let mut engine = build(store, clock);
    assert_eq!(engine.balance(), 150);
    assert_eq!(engine.bet(), 30);
    assert_eq!(engine.claim_daily(), ClaimOutcome::AlreadyClaimed);
}

#[test]
fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("arcade.json");
    let clock = clock();

    let balance = {
        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        let mut engine = build(store, clock.clone());
        engine.spin(10).unwrap().unwrap();
        engine.balance()
    };

    let store = Arc::new(JsonFileStore::open(&path).unwrap());
    let engine = build(store, clock);
    assert_eq!(engine.balance(), balance);
    assert!(engine.status_message().is_none());
}

#[test]
fn test_corrupt_fields_fall_back_independently() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            SLOT_STORE_KEY,
            r#"{"coins":"lots","bet":20,"lastClaimDate":"2025-12-31"}"#,
        )
        .unwrap();

    let mut engine = build(store, clock());
    assert_eq!(engine.balance(), 100);
    assert_eq!(engine.bet(), 20);
    assert_eq!(engine.claim_daily(), ClaimOutcome::AlreadyClaimed);
    assert!(engine.status_message().unwrap().contains("coins"));
}

#[test]
fn test_reset_clears_record() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = build(store.clone(), clock());
    engine.claim_daily();
    assert!(store.get(SLOT_STORE_KEY).unwrap().is_some());

    assert!(engine.reset_state());
    assert_eq!(engine.balance(), 100);
    assert_eq!(engine.claim_status(), ClaimStatus::Available);
    assert!(store.get(SLOT_STORE_KEY).unwrap().is_none());
    assert_eq!(
        engine.status_message(),
        Some("Slot machine progress cleared.")
    );
}

#[test]
fn test_staged_reveal_timeline() {
    let clock = clock();
    let mut engine = SlotEngine::with_parts(
        SlotConfig::default(),
        Arc::new(SymbolCatalog::standard().unwrap()),
        Arc::new(MemoryStore::new()),
        clock,
    )
    .unwrap()
    .with_seed(9);

    let reveal = engine.begin_spin(10).unwrap().unwrap();
    assert_eq!(reveal.len(), 21);
    assert_eq!(reveal.settle_at_ms, 2100);
    assert_eq!(engine.pending_reveal(), Some(&reveal));

    let final_grid = reveal.last().unwrap().snapshot;
    let result = engine.settle().unwrap().unwrap();
    assert_eq!(result.grid, final_grid);
    assert!(engine.pending_reveal().is_none());
}

#[test]
fn test_weighted_symbol_frequency() {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    let catalog = SymbolCatalog::standard().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let trials = 138_000;
    let mut counts = std::collections::HashMap::new();

    for _ in 0..trials {
        *counts.entry(catalog.draw(&mut rng)).or_insert(0usize) += 1;
    }

    for symbol in catalog.symbols() {
        let observed = counts.get(&symbol.id).copied().unwrap_or(0) as f64 / trials as f64;
        let expected = symbol.weight as f64 / 138.0;
        assert!(
            (observed - expected).abs() < 0.01,
            "{}: observed {:.4}, expected {:.4}",
            symbol.name,
            observed,
            expected
        );
    }
}
