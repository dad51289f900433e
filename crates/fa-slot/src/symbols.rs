//! Symbol definitions and the weighted symbol catalog

use std::collections::HashSet;

use fa_core::{FaError, FaResult, WeightedTable};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Symbol tier shown in the points & rarity guide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolTier {
    Common,
    Uncommon,
    Rare,
    Epic,
    /// Excluded from line matching, pays nothing
    Wild,
}

impl SymbolTier {
    /// Guide label
    pub fn label(&self) -> &'static str {
        match self {
            SymbolTier::Common => "Common",
            SymbolTier::Uncommon => "Uncommon",
            SymbolTier::Rare => "Rare",
            SymbolTier::Epic => "Epic",
            SymbolTier::Wild => "Wild (no points)",
        }
    }
}

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: u32,
    /// Symbol name (e.g., "discord", "wild")
    pub name: String,
    /// Points added to the reward for each matched line
    pub payout: u64,
    /// Relative draw weight
    pub weight: u32,
    pub tier: SymbolTier,
}

impl Symbol {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        payout: u64,
        weight: u32,
        tier: SymbolTier,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            payout,
            weight,
            tier,
        }
    }

    /// Create a wild symbol
    pub fn wild(id: u32, name: impl Into<String>, weight: u32) -> Self {
        Self::new(id, name, 0, weight, SymbolTier::Wild)
    }

    pub fn is_wild(&self) -> bool {
        self.tier == SymbolTier::Wild
    }
}

/// One row of the points & rarity guide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideEntry {
    pub name: String,
    pub payout: u64,
    pub tier_label: String,
}

/// Immutable symbol catalog with its draw table
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
    /// Draw table over indices into `symbols`
    table: WeightedTable<usize>,
}

impl SymbolCatalog {
    /// Build a catalog; ids must be unique and at least one symbol must be drawable
    pub fn new(symbols: Vec<Symbol>) -> FaResult<Self> {
        let mut seen = HashSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol.id) {
                return Err(FaError::InvalidParam(format!(
                    "duplicate symbol id {} ({})",
                    symbol.id, symbol.name
                )));
            }
        }

        let table = WeightedTable::new(symbols.iter().enumerate().map(|(i, s)| (i, s.weight)))?;
        Ok(Self { symbols, table })
    }

    /// The portfolio site's nine symbols (total weight 138)
    pub fn standard() -> FaResult<Self> {
        let symbols = vec![
            Symbol::new(0, "discord", 80, 20, SymbolTier::Common),
            Symbol::new(1, "github", 100, 15, SymbolTier::Uncommon),
            Symbol::new(2, "twitter-x", 120, 10, SymbolTier::Rare),
            Symbol::new(3, "unity", 150, 5, SymbolTier::Epic),
            Symbol::new(4, "club", 60, 20, SymbolTier::Common),
            Symbol::new(5, "diamond", 60, 20, SymbolTier::Common),
            Symbol::new(6, "heart", 60, 20, SymbolTier::Common),
            Symbol::new(7, "spade", 60, 20, SymbolTier::Common),
            Symbol::wild(8, "wild", 8),
        ];

        Self::new(symbols)
    }

    /// Draw one symbol id
    pub fn draw<R: Rng>(&self, rng: &mut R) -> u32 {
        self.symbols[*self.table.draw(rng)].id
    }

    pub fn get(&self, id: u32) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub fn is_wild(&self, id: u32) -> bool {
        self.get(id).is_some_and(Symbol::is_wild)
    }

    /// Payout for a symbol id, 0 for unknown ids
    pub fn payout(&self, id: u32) -> u64 {
        self.get(id).map(|s| s.payout).unwrap_or(0)
    }

    /// Probability of drawing `id` on a single cell
    pub fn probability(&self, id: u32) -> f64 {
        self.symbols
            .iter()
            .position(|s| s.id == id)
            .map(|idx| self.table.probability(idx))
            .unwrap_or(0.0)
    }

    pub fn total_weight(&self) -> u64 {
        self.table.total_weight()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Every symbol in catalog order with its payout and tier label
    pub fn guide(&self) -> Vec<GuideEntry> {
        self.symbols
            .iter()
            .map(|s| GuideEntry {
                name: s.name.clone(),
                payout: s.payout,
                tier_label: s.tier.label().to_string(),
            })
            .collect()
    }
}
