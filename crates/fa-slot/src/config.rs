//! Slot engine configuration

use fa_core::{FaError, FaResult};
use serde::{Deserialize, Serialize};

use crate::timing::SpinTiming;

/// Complete slot configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Balance for a fresh (or unreadable) save
    pub starting_coins: u64,
    /// Smallest accepted bet, also the bet floor after clamping
    pub min_bet: u64,
    /// Bet change per +/- press
    pub bet_step: u64,
    /// Bet at which rewards pay face value
    pub base_bet_unit: u64,
    /// Added to the reward when every payline matches
    pub jackpot_bonus: u64,
    /// Coins granted by the daily claim
    pub daily_bonus: u64,
    /// Reveal timing
    pub timing: SpinTiming,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            starting_coins: 100,
            min_bet: 10,
            bet_step: 10,
            base_bet_unit: 10,
            jackpot_bonus: 500,
            daily_bonus: 50,
            timing: SpinTiming::normal(),
        }
    }
}

impl SlotConfig {
    /// Default economy with no reveal delay
    pub fn instant() -> Self {
        Self {
            timing: SpinTiming::instant(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> FaResult<()> {
        if self.min_bet == 0 {
            return Err(FaError::Config("min_bet must be positive".into()));
        }
        if self.bet_step == 0 {
            return Err(FaError::Config("bet_step must be positive".into()));
        }
        if self.base_bet_unit == 0 {
            return Err(FaError::Config("base_bet_unit must be positive".into()));
        }
        self.timing.validate()
    }

    /// Clamp a bet to `[min_bet, balance]`, resting at `min_bet` when the balance is lower
    pub fn clamp_bet(&self, bet: u64, balance: u64) -> u64 {
        bet.min(balance).max(self.min_bet)
    }
}
