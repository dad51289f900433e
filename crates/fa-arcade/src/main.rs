//! Folio Arcade command line
//!
//! Usage:
//!   arcade spin [--bet N] [--count N]   - Spin the slot machine
//!   arcade bet <DELTA>                  - Raise or lower the bet
//!   arcade claim                        - Claim the daily bonus
//!   arcade open [--count N]             - Open card packs
//!   arcade dex [--missing]              - Show the card dex
//!   arcade guide                        - Show the points & rarity guide
//!   arcade status [--json]              - Show balances and collection
//!   arcade reset [--slot] [--cards]     - Clear saved progress
//!   arcade simulate                     - Estimate hit rate and return

mod config;
mod render;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use fa_cards::{CardConfig, CardEngine, Rarity};
use fa_core::{FaError, JsonFileStore, KeyValueStore, MemoryStore};
use fa_slot::{SlotConfig, SlotEngine, SpinTiming};

use crate::config::ArcadeConfig;

#[derive(Parser)]
#[command(name = "arcade", about = "Folio Arcade slot machine and card packs")]
struct Cli {
    /// Config file (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Save file, overriding the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Seed the random source for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spin the slot machine
    Spin {
        /// Bet amount (current bet when omitted)
        #[arg(short, long)]
        bet: Option<u64>,
        /// Number of spins
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
    /// Change the bet by DELTA coins
    Bet {
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Claim the daily bonus
    Claim,
    /// Open card packs
    Open {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
    /// Show the card dex
    Dex {
        /// Only list missing cards
        #[arg(long)]
        missing: bool,
    },
    /// Show the points & rarity guide
    Guide,
    /// Show balance, bet and collection progress
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear saved progress (both games when no flag is given)
    Reset {
        #[arg(long)]
        slot: bool,
        #[arg(long)]
        cards: bool,
    },
    /// Run many spins and packs in memory
    Simulate {
        #[arg(long, default_value_t = 10_000)]
        spins: u64,
        #[arg(long, default_value_t = 1_000)]
        packs: u64,
        /// Bet per spin (minimum bet when omitted)
        #[arg(long)]
        bet: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = ArcadeConfig::load_or_default(cli.config.as_deref())?;
    if let Some(path) = cli.store.clone() {
        config.store.path = Some(path);
        config.store.in_memory = false;
    }
    // One-shot commands have nothing to animate
    config.slot.timing = SpinTiming::instant();
    config.cards.timing = fa_cards::PackTiming::instant();

    run(cli.command, &config, cli.seed)
}

fn open_store(config: &ArcadeConfig) -> Result<Arc<dyn KeyValueStore>> {
    if config.store.in_memory {
        return Ok(Arc::new(MemoryStore::new()));
    }
    let path = config.store.resolved_path();
    let store = JsonFileStore::open(&path)
        .with_context(|| format!("opening save file {}", path.display()))?;
    log::info!("Using save file {}", path.display());
    print_advisory(store.recovery_notice());
    Ok(Arc::new(store))
}

fn slot_engine(
    config: &ArcadeConfig,
    store: Arc<dyn KeyValueStore>,
    seed: Option<u64>,
) -> Result<SlotEngine> {
    let engine = SlotEngine::new(config.slot.clone(), store)?;
    Ok(match seed {
        Some(seed) => engine.with_seed(seed),
        None => engine,
    })
}

fn card_engine(
    config: &ArcadeConfig,
    store: Arc<dyn KeyValueStore>,
    seed: Option<u64>,
) -> Result<CardEngine> {
    let engine = CardEngine::new(config.cards.clone(), store)?;
    Ok(match seed {
        Some(seed) => engine.with_seed(seed),
        None => engine,
    })
}

fn run(command: Commands, config: &ArcadeConfig, seed: Option<u64>) -> Result<()> {
    match command {
        Commands::Simulate { spins, packs, bet } => {
            simulate(&config.slot, &config.cards, spins, packs, bet, seed)?;
        }
        Commands::Spin { bet, count } => {
            let mut slot = slot_engine(config, open_store(config)?, seed)?;
            for line in spin_batch(&mut slot, bet, count)? {
                println!("{}", line);
            }
            println!("{}", render::slot_status(&slot));
            print_advisory(slot.status_message());
        }
        Commands::Bet { delta } => {
            let store = open_store(config)?;
            let mut slot = slot_engine(config, store, seed)?;
            if let Some(bet) = slot.adjust_bet(delta) {
                println!("Bet is now {} (balance {})", bet, slot.balance());
            }
            print_advisory(slot.status_message());
        }
        Commands::Claim => {
            let store = open_store(config)?;
            let mut slot = slot_engine(config, store, seed)?;
            let outcome = slot.claim_daily();
            println!("{}", render::claim(&outcome));
            print_advisory(slot.status_message());
        }
        Commands::Open { count } => {
            let store = open_store(config)?;
            let mut cards = card_engine(config, store, seed)?;
            for _ in 0..count.max(1) {
                if let Some(result) = cards.open_pack() {
                    println!("{}\n", render::pack(&result));
                }
            }
            println!("{}", cards.dex().progress_label());
            print_advisory(cards.status_message());
        }
        Commands::Dex { missing } => {
            let store = open_store(config)?;
            let cards = card_engine(config, store, seed)?;
            print!("{}", render::dex(&cards.dex(), missing));
        }
        Commands::Guide => {
            let store = open_store(config)?;
            let slot = slot_engine(config, store, seed)?;
            print!("{}", render::guide(slot.catalog()));
        }
        Commands::Status { json } => {
            let store = open_store(config)?;
            let slot = slot_engine(config, store.clone(), seed)?;
            let cards = card_engine(config, store, seed)?;
            if json {
                let value = serde_json::json!({
                    "slot": slot.status(),
                    "cards": cards.status(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", render::slot_status(&slot));
                println!(
                    "📦 Packs opened: {}  {}",
                    cards.packs_opened(),
                    cards.dex().progress_label()
                );
                print_advisory(slot.status_message());
                print_advisory(cards.status_message());
            }
        }
        Commands::Reset { slot, cards } => {
            let store = open_store(config)?;
            let both = !slot && !cards;
            if slot || both {
                let mut engine = slot_engine(config, store.clone(), seed)?;
                engine.reset_state();
                print_advisory(engine.status_message());
            }
            if cards || both {
                let mut engine = card_engine(config, store, seed)?;
                engine.reset_state();
                print_advisory(engine.status_message());
            }
        }
    }

    Ok(())
}

/// Run up to `count` spins, stopping at the first refused bet
///
/// Returns the rendered lines; a refused bet ends the batch with its reason.
fn spin_batch(slot: &mut SlotEngine, bet: Option<u64>, count: u32) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for _ in 0..count.max(1) {
        let bet = bet.unwrap_or_else(|| slot.bet());
        match slot.spin(bet) {
            Ok(Some(result)) => {
                lines.push(format!("{}\n", render::spin(&result, slot.catalog())));
            }
            Ok(None) => {
                lines.push("A spin is already in progress.".to_string());
                break;
            }
            Err(e @ (FaError::InsufficientFunds { .. } | FaError::InvalidParam(_))) => {
                lines.push(format!("✋ {}", e));
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(lines)
}

fn print_advisory(message: Option<&str>) {
    if let Some(message) = message {
        println!("ℹ {}", message);
    }
}

/// Spin and open packs against an in-memory store, then report frequencies
fn simulate(
    slot: &SlotConfig,
    cards: &CardConfig,
    spins: u64,
    packs: u64,
    bet: Option<u64>,
    seed: Option<u64>,
) -> Result<()> {
    let bet = bet.unwrap_or(slot.min_bet);
    let slot_config = SlotConfig {
        starting_coins: bet.saturating_mul(spins.max(1)),
        ..slot.clone()
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut slot_engine = SlotEngine::new(slot_config, store.clone())?;
    let mut card_engine = CardEngine::new(cards.clone(), store)?;
    if let Some(seed) = seed {
        slot_engine.seed(seed);
        card_engine.seed(seed.wrapping_add(1));
    }

    for _ in 0..spins {
        match slot_engine.spin(bet) {
            Ok(Some(_)) => {}
            Ok(None) => bail!("slot engine stayed busy during simulation"),
            Err(e @ (FaError::InsufficientFunds { .. } | FaError::InvalidParam(_))) => {
                println!("✋ {}", e);
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    println!("Slot: {}", render::stats(slot_engine.stats()));

    let mut by_rarity: BTreeMap<Rarity, u64> = BTreeMap::new();
    for _ in 0..packs {
        if let Some(result) = card_engine.open_pack() {
            for card in &result.cards {
                *by_rarity.entry(card.rarity).or_insert(0) += 1;
            }
        }
    }

    let drawn: u64 = by_rarity.values().sum();
    println!(
        "Cards: {} packs, {} cards, {}",
        packs,
        drawn,
        card_engine.dex().progress_label()
    );
    let catalog = card_engine.catalog().clone();
    for rarity in Rarity::ALL {
        let count = by_rarity.get(&rarity).copied().unwrap_or(0);
        let observed = if drawn > 0 {
            count as f64 / drawn as f64 * 100.0
        } else {
            0.0
        };
        println!(
            "  {:<5} {:<10} {:>7} ({:>5.2}% observed, {:>5.2}% expected)",
            rarity.glyph(),
            rarity,
            count,
            observed,
            catalog.rarity_probability(rarity) * 100.0
        );
    }

    Ok(())
}
