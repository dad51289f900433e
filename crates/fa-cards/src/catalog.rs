//! Card definitions, rarity tiers and the weighted card catalog

use std::collections::HashSet;
use std::fmt;

use fa_core::{FaError, FaResult, WeightedTable};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Rarity tier, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythical,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythical => "Mythical",
        }
    }

    /// Badge shown on the card face
    pub fn glyph(&self) -> &'static str {
        match self {
            Rarity::Common => "♦",
            Rarity::Uncommon => "♦♦",
            Rarity::Rare => "♦♦♦",
            Rarity::Epic => "♦♦♦♦",
            Rarity::Legendary => "★",
            Rarity::Mythical => "♛",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Draw weight per rarity; every card of a tier enters the pool with its tier's weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityWeights {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
    pub epic: u32,
    pub legendary: u32,
    pub mythical: u32,
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self {
            common: 40,
            uncommon: 25,
            rare: 15,
            epic: 10,
            legendary: 7,
            mythical: 3,
        }
    }
}

impl RarityWeights {
    pub fn weight(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
            Rarity::Mythical => self.mythical,
        }
    }

    pub fn validate(&self) -> FaResult<()> {
        if Rarity::ALL.iter().all(|r| self.weight(*r) == 0) {
            return Err(FaError::Config("all rarity weights are zero".into()));
        }
        Ok(())
    }
}

/// A collectible card
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique name, also the collection key
    pub name: String,
    /// Artwork file name
    pub image: String,
    pub rarity: Rarity,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moves: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
}

impl Card {
    pub fn new(name: &str, image: &str, rarity: Rarity, moves: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            rarity,
            moves: moves.iter().map(|m| m.to_string()).collect(),
            ability: None,
        }
    }

    pub fn with_ability(mut self, ability: &str) -> Self {
        self.ability = Some(ability.to_string());
        self
    }
}

/// The portfolio site's thirty cards, five per rarity
pub fn standard_cards() -> Vec<Card> {
    use Rarity::*;

    vec![
        Card::new("Green Goblin", "goblin.png", Common, &["Poison Dagger"]),
        Card::new("Cave Rat", "cave-rat.png", Common, &["Gnaw"]),
        Card::new("Rusty Golem", "rusty-golem.png", Common, &["Smash"]),
        Card::new("Forest Imp", "forest-imp.png", Common, &["Vine Whip"]),
        Card::new("River Sprite", "river-sprite.png", Common, &["Water Jet"]),
        Card::new("Knight", "knight.png", Uncommon, &["Shield Bash"]),
        Card::new("Shadow Rogue", "shadow-rogue.png", Uncommon, &["Backstab"]),
        Card::new("Lava Hound", "lava-hound.png", Uncommon, &["Magma Bite"]),
        Card::new("Sand Witch", "sand-witch.png", Uncommon, &["Dust Hex"]),
        Card::new("Tundra Wolf", "tundra-wolf.png", Uncommon, &["Frost Fang"]),
        Card::new("Dragon Egg", "egg.png", Rare, &["Hatch Shock"]),
        Card::new("Stormcaller", "stormcaller.png", Rare, &["Lightning Surge"]),
        Card::new(
            "Crystal Seer",
            "crystal-seer.png",
            Rare,
            &["Clairvoyant Ray"],
        ),
        Card::new(
            "Steel Basilisk",
            "steel-basilisk.png",
            Rare,
            &["Iron Glare"],
        ),
        Card::new(
            "Wraith Captain",
            "wraith-captain.png",
            Rare,
            &["Spectral Slash"],
        ),
        Card::new("Rainbow Phoenix", "phoenix.png", Epic, &["Blaze Wing"])
            .with_ability("Rebirth"),
        Card::new(
            "Astral Paladin",
            "astral-paladin.png",
            Epic,
            &["Starstrike", "Holy Barrier"],
        ),
        Card::new("Doomsmith", "doomsmith.png", Epic, &["Anvil Crush"])
            .with_ability("Forge Curse"),
        Card::new(
            "Plague Harbinger",
            "plague-harbinger.png",
            Epic,
            &["Toxic Bloom", "Death Spores"],
        ),
        Card::new(
            "Volcanic Chimera",
            "volcanic-chimera.png",
            Epic,
            &["Lava Roar"],
        )
        .with_ability("Molten Regrowth"),
        Card::new("Time Lord", "timelord.png", Legendary, &["Temporal Slash"])
            .with_ability("Rewind Turn"),
        Card::new(
            "Celestial Dragon",
            "celestial-dragon.png",
            Legendary,
            &["Starfire Breath", "Heavenly Roar"],
        ),
        Card::new(
            "The First Blade",
            "first-blade.png",
            Legendary,
            &["Primordial Cut"],
        )
        .with_ability("Echo Strike"),
        Card::new(
            "Quantum Djinn",
            "quantum-djinn.png",
            Legendary,
            &["Reality Rift", "Phase Blast"],
        ),
        Card::new(
            "Bloodmoon Guardian",
            "bloodmoon-guardian.png",
            Legendary,
            &["Lunar Fang"],
        )
        .with_ability("Red Eclipse"),
        Card::new(
            "Eclipse Beast",
            "eclipse-beast.png",
            Mythical,
            &["Void Claw"],
        )
        .with_ability("Total Eclipse"),
        Card::new(
            "World Serpent",
            "world-serpent.png",
            Mythical,
            &["Continental Crush", "Tectonic Coil"],
        ),
        Card::new(
            "Chrono Witch",
            "chrono-witch.jpg",
            Mythical,
            &["Hourglass Hex"],
        )
        .with_ability("Time Bend"),
        Card::new(
            "Oblivion Angel",
            "oblivion-angel.png",
            Mythical,
            &["Fallen Light", "Silence of Fate"],
        ),
        Card::new(
            "Prism Golem",
            "prism-golem.png",
            Mythical,
            &["Spectral Shard"],
        )
        .with_ability("Refract Shield"),
    ]
}

/// Immutable card catalog with its draw table
#[derive(Debug, Clone)]
pub struct CardCatalog {
    cards: Vec<Card>,
    weights: RarityWeights,
    /// Draw table over indices into `cards`
    table: WeightedTable<usize>,
}

impl CardCatalog {
    /// Build a catalog; names must be unique and some card must be drawable
    pub fn new(cards: Vec<Card>, weights: RarityWeights) -> FaResult<Self> {
        let mut seen = HashSet::new();
        for card in &cards {
            if !seen.insert(card.name.as_str()) {
                return Err(FaError::InvalidParam(format!(
                    "duplicate card name '{}'",
                    card.name
                )));
            }
        }

        let table = WeightedTable::new(
            cards
                .iter()
                .enumerate()
                .map(|(i, card)| (i, weights.weight(card.rarity))),
        )?;

        Ok(Self {
            cards,
            weights,
            table,
        })
    }

    /// Standard cards with custom rarity weights
    pub fn standard_with_weights(weights: RarityWeights) -> FaResult<Self> {
        Self::new(standard_cards(), weights)
    }

    /// Standard cards and weights (total weight 500)
    pub fn standard() -> FaResult<Self> {
        Self::standard_with_weights(RarityWeights::default())
    }

    /// Draw one card
    pub fn draw<R: Rng>(&self, rng: &mut R) -> &Card {
        &self.cards[*self.table.draw(rng)]
    }

    pub fn get(&self, name: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Probability that a single draw yields the named card
    pub fn probability(&self, name: &str) -> f64 {
        self.cards
            .iter()
            .position(|c| c.name == name)
            .map(|idx| self.table.probability(idx))
            .unwrap_or(0.0)
    }

    /// Probability that a single draw lands in `rarity`
    pub fn rarity_probability(&self, rarity: Rarity) -> f64 {
        let tier: u64 = self
            .cards
            .iter()
            .filter(|c| c.rarity == rarity)
            .map(|c| u64::from(self.weights.weight(c.rarity)))
            .sum();
        tier as f64 / self.table.total_weight() as f64
    }

    pub fn by_rarity(&self, rarity: Rarity) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.rarity == rarity)
    }

    pub fn total_weight(&self) -> u64 {
        self.table.total_weight()
    }

    pub fn weights(&self) -> &RarityWeights {
        &self.weights
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog() {
        let catalog = CardCatalog::standard().unwrap();
        assert_eq!(catalog.len(), 30);
        assert_eq!(catalog.total_weight(), 500);
        for rarity in Rarity::ALL {
            assert_eq!(catalog.by_rarity(rarity).count(), 5);
        }
    }

    #[test]
    fn test_card_probability() {
        let catalog = CardCatalog::standard().unwrap();
        assert!((catalog.probability("Green Goblin") - 40.0 / 500.0).abs() < 1e-12);
        assert!((catalog.probability("Prism Golem") - 3.0 / 500.0).abs() < 1e-12);
        assert!((catalog.rarity_probability(Rarity::Mythical) - 15.0 / 500.0).abs() < 1e-12);
        assert_eq!(catalog.probability("Missingno"), 0.0);
    }

    #[test]
    fn test_rarity_order_and_glyphs() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Legendary < Rarity::Mythical);
        assert_eq!(Rarity::Epic.glyph(), "♦♦♦♦");
        assert_eq!(Rarity::Legendary.glyph(), "★");
        assert_eq!(Rarity::Mythical.glyph(), "♛");
    }

    #[test]
    fn test_zero_weight_tier_never_drawn() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        let weights = RarityWeights {
            mythical: 0,
            ..RarityWeights::default()
        };
        let catalog = CardCatalog::standard_with_weights(weights).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..5_000 {
            assert_ne!(catalog.draw(&mut rng).rarity, Rarity::Mythical);
        }
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let weights = RarityWeights {
            common: 0,
            uncommon: 0,
            rare: 0,
            epic: 0,
            legendary: 0,
            mythical: 0,
        };
        assert!(weights.validate().is_err());
        assert!(CardCatalog::standard_with_weights(weights).is_err());
    }

    #[test]
    fn test_card_json_shape() {
        let catalog = CardCatalog::standard().unwrap();
        let card = catalog.get("Time Lord").unwrap();
        let value = serde_json::to_value(card).unwrap();
        assert_eq!(value["rarity"], "Legendary");
        assert_eq!(value["ability"], "Rewind Turn");
        assert_eq!(value["moves"][0], "Temporal Slash");
    }
}
