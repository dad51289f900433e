//! Plain-text rendering of engine state

use fa_cards::{CardDex, PackResult, Rarity};
use fa_slot::{ClaimOutcome, SessionStats, SlotEngine, SpinResult, SymbolCatalog};

pub fn spin(result: &SpinResult, catalog: &SymbolCatalog) -> String {
    let mut out = String::new();
    out.push_str(&result.grid.describe(catalog));
    out.push('\n');
    out.push_str(&result.message);
    out.push('\n');
    out.push_str(&format!(
        "{}: bet {}, reward {} pts, +{} coins, balance {}",
        result.spin_id, result.bet, result.reward, result.coin_delta, result.balance_after
    ));
    out
}

pub fn claim(outcome: &ClaimOutcome) -> String {
    match outcome {
        ClaimOutcome::Credited { amount, balance } => {
            format!("🎁 Daily bonus: +{} coins (balance {})", amount, balance)
        }
        ClaimOutcome::AlreadyClaimed => "Daily bonus already claimed today.".to_string(),
        ClaimOutcome::Busy => "A spin is in progress.".to_string(),
    }
}

pub fn guide(catalog: &SymbolCatalog) -> String {
    let mut out = String::from("Points & rarity guide\n");
    for entry in catalog.guide() {
        out.push_str(&format!(
            "  {:<10} {:>4} pts  {}\n",
            entry.name, entry.payout, entry.tier_label
        ));
    }
    out
}

pub fn pack(result: &PackResult) -> String {
    let mut out = format!("📦 {} (packs opened: {})\n", result.pack_id, result.packs_opened);
    for card in &result.cards {
        let new = if result.new_cards.contains(&card.name) {
            "  NEW"
        } else {
            ""
        };
        out.push_str(&format!(
            "  {:<5} {:<20} {:<10}{}\n",
            card.rarity.glyph(),
            card.name,
            card.rarity,
            new
        ));
    }
    if let Some(best) = result.best_rarity() {
        out.push_str(&format!("Best pull: {} {}", best.glyph(), best));
    }
    out
}

pub fn dex(dex: &CardDex, missing_only: bool) -> String {
    let mut out = format!("{} (packs opened: {})\n", dex.progress_label(), dex.packs_opened);
    for rarity in Rarity::ALL {
        let (owned, total) = dex.rarity_progress(rarity);
        out.push_str(&format!("{} {} ({}/{})\n", rarity.glyph(), rarity, owned, total));
        for entry in dex.entries.iter().filter(|e| e.card.rarity == rarity) {
            if missing_only && entry.is_owned() {
                continue;
            }
            if entry.is_owned() {
                out.push_str(&format!("  {:<20} x{}\n", entry.card.name, entry.count));
            } else {
                out.push_str("  ???\n");
            }
        }
    }
    out
}

pub fn stats(stats: &SessionStats) -> String {
    format!(
        "spins {}, wins {} ({:.1}% hit rate), big wins {}, jackpots {}, wagered {}, won {} ({:.1}% return)",
        stats.total_spins,
        stats.wins,
        stats.hit_rate(),
        stats.big_wins,
        stats.jackpots,
        stats.total_wagered,
        stats.total_won,
        stats.return_pct()
    )
}

pub fn slot_status(engine: &SlotEngine) -> String {
    format!(
        "🪙 Coins: {}  Bet: {}  {}",
        engine.balance(),
        engine.bet(),
        engine.claim_status().label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fa_cards::{CardCatalog, CardCollection};

    #[test]
    fn test_guide_lists_every_symbol() {
        let catalog = SymbolCatalog::standard().unwrap();
        let text = guide(&catalog);
        assert_eq!(text.lines().count(), 10);
        assert!(text.contains("Wild (no points)"));
    }

    #[test]
    fn test_dex_hides_missing_names() {
        let catalog = CardCatalog::standard().unwrap();
        let mut collection = CardCollection::new();
        collection.apply_pack([catalog.get("Knight").unwrap()]);

        let text = dex(&CardDex::build(&catalog, &collection), false);
        assert!(text.starts_with("Collected 1 of 30"));
        assert!(text.contains("Knight"));
        assert!(!text.contains("Green Goblin"));
    }

    #[test]
    fn test_claim_text() {
        let text = claim(&ClaimOutcome::Credited {
            amount: 50,
            balance: 150,
        });
        assert!(text.contains("+50"));
    }
}
