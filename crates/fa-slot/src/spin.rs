//! Spin result and outcome classification

use serde::{Deserialize, Serialize};

use crate::paytable::{EvaluationResult, Grid, LineWin};

/// Minimum matched lines for a big win
pub const BIG_WIN_MATCHES: usize = 3;

/// Outcome classification shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpinOutcome {
    /// Every payline matched
    Jackpot,
    /// Three or more lines
    BigWin,
    /// One or two lines
    Win,
    NoWin,
}

impl SpinOutcome {
    pub fn classify(match_count: usize, jackpot: bool) -> Self {
        if jackpot {
            SpinOutcome::Jackpot
        } else if match_count >= BIG_WIN_MATCHES {
            SpinOutcome::BigWin
        } else if match_count >= 1 {
            SpinOutcome::Win
        } else {
            SpinOutcome::NoWin
        }
    }

    /// Result message for `match_count` matched lines
    pub fn message(&self, match_count: usize) -> String {
        match self {
            SpinOutcome::Jackpot => "🌟 ULTIMATE JACKPOT! Full board match!".to_string(),
            SpinOutcome::BigWin => format!("🔥 {} matches! Huge win!", match_count),
            SpinOutcome::Win if match_count == 1 => "✅ 1 line matched!".to_string(),
            SpinOutcome::Win => format!("✅ {} lines matched!", match_count),
            SpinOutcome::NoWin => "😢 No match, try again.".to_string(),
        }
    }

    pub fn is_win(&self) -> bool {
        !matches!(self, SpinOutcome::NoWin)
    }
}

/// Coins credited for a reward at a bet
///
/// `reward × bet / unit`, rounded half-up to a whole coin.
pub fn coin_delta(reward: u64, bet: u64, base_bet_unit: u64) -> u64 {
    let unit = u128::from(base_bet_unit.max(1));
    let scaled = (u128::from(reward) * u128::from(bet) + unit / 2) / unit;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Complete settled spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Spin ID
    pub spin_id: String,
    /// Final grid
    pub grid: Grid,
    /// Bet debited for this spin
    pub bet: u64,
    pub line_wins: Vec<LineWin>,
    pub match_count: usize,
    /// Payout points including any jackpot bonus
    pub reward: u64,
    pub jackpot: bool,
    /// Coins credited at settlement
    pub coin_delta: u64,
    /// Balance once the delta is credited
    pub balance_after: u64,
    pub outcome: SpinOutcome,
    pub message: String,
}

impl SpinResult {
    pub fn new(
        spin_id: String,
        grid: Grid,
        bet: u64,
        eval: EvaluationResult,
        coin_delta: u64,
        balance_after: u64,
    ) -> Self {
        let outcome = SpinOutcome::classify(eval.match_count, eval.jackpot);
        let message = outcome.message(eval.match_count);

        Self {
            spin_id,
            grid,
            bet,
            line_wins: eval.line_wins,
            match_count: eval.match_count,
            reward: eval.reward,
            jackpot: eval.jackpot,
            coin_delta,
            balance_after,
            outcome,
            message,
        }
    }

    pub fn is_win(&self) -> bool {
        self.outcome.is_win()
    }

    /// Coins won minus coins bet
    pub fn net(&self) -> i128 {
        i128::from(self.coin_delta) - i128::from(self.bet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(SpinOutcome::classify(8, true), SpinOutcome::Jackpot);
        assert_eq!(SpinOutcome::classify(3, false), SpinOutcome::BigWin);
        assert_eq!(SpinOutcome::classify(2, false), SpinOutcome::Win);
        assert_eq!(SpinOutcome::classify(1, false), SpinOutcome::Win);
        assert_eq!(SpinOutcome::classify(0, false), SpinOutcome::NoWin);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            SpinOutcome::Jackpot.message(8),
            "🌟 ULTIMATE JACKPOT! Full board match!"
        );
        assert_eq!(SpinOutcome::BigWin.message(4), "🔥 4 matches! Huge win!");
        assert_eq!(SpinOutcome::Win.message(1), "✅ 1 line matched!");
        assert_eq!(SpinOutcome::Win.message(2), "✅ 2 lines matched!");
        assert_eq!(SpinOutcome::NoWin.message(0), "😢 No match, try again.");
    }

    #[test]
    fn test_coin_delta_rounding() {
        assert_eq!(coin_delta(80, 10, 10), 80);
        assert_eq!(coin_delta(80, 20, 10), 160);
        // 60 × 15 / 10 = 90 exactly
        assert_eq!(coin_delta(60, 15, 10), 90);
        // 80 × 13 / 10 = 104
        assert_eq!(coin_delta(80, 13, 10), 104);
        // 150 × 13 / 10 = 195
        assert_eq!(coin_delta(150, 13, 10), 195);
        // 5 × 1 / 10 = 0.5 rounds up
        assert_eq!(coin_delta(5, 1, 10), 1);
        // 4 × 1 / 10 = 0.4 rounds down
        assert_eq!(coin_delta(4, 1, 10), 0);
        assert_eq!(coin_delta(0, 50, 10), 0);
    }

    #[test]
    fn test_coin_delta_saturates() {
        assert_eq!(coin_delta(u64::MAX, u64::MAX, 1), u64::MAX);
    }
}
