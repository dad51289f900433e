//! Card engine configuration

use fa_core::{FaError, FaResult};
use serde::{Deserialize, Serialize};

use crate::catalog::RarityWeights;
use crate::pack::PackTiming;

/// Complete card engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Cards per pack
    pub pack_size: usize,
    /// Draw weight per rarity tier
    pub rarity_weights: RarityWeights,
    /// Flip/reveal timing
    pub timing: PackTiming,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            pack_size: 5,
            rarity_weights: RarityWeights::default(),
            timing: PackTiming::normal(),
        }
    }
}

impl CardConfig {
    /// Default pack with no reveal delay
    pub fn instant() -> Self {
        Self {
            timing: PackTiming::instant(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> FaResult<()> {
        if self.pack_size == 0 {
            return Err(FaError::Config("pack_size must be positive".into()));
        }
        self.rarity_weights.validate()
    }
}
