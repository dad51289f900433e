//! Slot Engine — spin, settle, daily bonus and bet control

use std::sync::Arc;

use fa_core::{
    Clock, EnginePhase, FaError, FaResult, KeyValueStore, LocalClock, Reveal, SLOT_STORE_KEY,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::SlotConfig;
use crate::daily::{ClaimOutcome, ClaimStatus};
use crate::paytable::{Grid, PayTable};
use crate::spin::{SpinOutcome, SpinResult, coin_delta};
use crate::state::{SlotState, reconcile_slot_state};
use crate::symbols::SymbolCatalog;

/// Session statistics (in memory only)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub wins: u64,
    pub big_wins: u64,
    pub jackpots: u64,
    /// Coins debited by spins
    pub total_wagered: u64,
    /// Coins credited by spins
    pub total_won: u64,
    pub bonuses_claimed: u64,
}

impl SessionStats {
    /// Percentage of spins that matched at least one line
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Coins won as a percentage of coins wagered
    pub fn return_pct(&self) -> f64 {
        if self.total_wagered > 0 {
            (self.total_won as f64 / self.total_wagered as f64) * 100.0
        } else {
            0.0
        }
    }

    fn record(&mut self, result: &SpinResult) {
        self.total_spins += 1;
        self.total_wagered += result.bet;
        self.total_won += result.coin_delta;
        match result.outcome {
            SpinOutcome::Jackpot => {
                self.wins += 1;
                self.jackpots += 1;
            }
            SpinOutcome::BigWin => {
                self.wins += 1;
                self.big_wins += 1;
            }
            SpinOutcome::Win => self.wins += 1,
            SpinOutcome::NoWin => {}
        }
    }
}

/// Snapshot of everything the UI renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotStatus {
    pub balance: u64,
    pub bet: u64,
    pub phase: EnginePhase,
    pub claim: ClaimStatus,
    pub grid: Option<Grid>,
    pub last_message: Option<String>,
    /// Advisory persistence message
    pub status: Option<String>,
}

/// Spin decided at `begin_spin`, applied at `settle`
#[derive(Debug, Clone)]
struct PendingSpin {
    spin_id: String,
    bet: u64,
    grid: Grid,
    reveal: Reveal<Grid>,
}

/// Slot machine engine
///
/// Outcomes are decided when a spin begins and applied exactly once when it
/// settles. The bet is debited up front.
pub struct SlotEngine {
    config: SlotConfig,
    catalog: Arc<SymbolCatalog>,
    paytable: PayTable,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    rng: ChaCha8Rng,
    state: SlotState,
    phase: EnginePhase,
    /// Last settled grid
    grid: Option<Grid>,
    pending: Option<PendingSpin>,
    last_result: Option<SpinResult>,
    spin_count: u64,
    stats: SessionStats,
    status: Option<String>,
    /// `status` currently reports a failed write
    save_failed: bool,
}

impl SlotEngine {
    /// Create with the standard catalog and the local clock, loading saved state
    pub fn new(config: SlotConfig, store: Arc<dyn KeyValueStore>) -> FaResult<Self> {
        Self::with_parts(
            config,
            Arc::new(SymbolCatalog::standard()?),
            store,
            Arc::new(LocalClock),
        )
    }

    /// Create with an explicit catalog and clock
    pub fn with_parts(
        config: SlotConfig,
        catalog: Arc<SymbolCatalog>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> FaResult<Self> {
        config.validate()?;

        let raw = match store.get(SLOT_STORE_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Slot store read failed: {}", e);
                None
            }
        };
        let loaded = reconcile_slot_state(raw.as_deref(), &config);

        log::info!(
            "Slot machine loaded: {} coins, bet {}",
            loaded.state.coins,
            loaded.state.bet
        );

        Ok(Self {
            paytable: PayTable::standard(config.jackpot_bonus),
            config,
            catalog,
            store,
            clock,
            rng: ChaCha8Rng::from_os_rng(),
            state: loaded.state,
            phase: EnginePhase::Idle,
            grid: None,
            pending: None,
            last_result: None,
            spin_count: 0,
            stats: SessionStats::default(),
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
    // SPIN
    // ═══════════════════════════════════════════════════════════════════════════

    /// Debit `bet`, decide the final grid and start the reveal
    ///
    /// Returns `Ok(None)` while another spin is running.
    pub fn begin_spin(&mut self, bet: u64) -> FaResult<Option<Reveal<Grid>>> {
        if self.phase.is_busy() {
            log::debug!("Spin ignored: engine busy");
            return Ok(None);
        }
        self.check_bet(bet)?;

        let grid = Grid::draw(&self.catalog, &mut self.rng);
        Ok(Some(self.start_spin(bet, grid)))
    }

    /// Begin a spin with a predetermined final grid (forced outcome)
    pub fn begin_spin_with_grid(&mut self, bet: u64, grid: Grid) -> FaResult<Option<Reveal<Grid>>> {
        if self.phase.is_busy() {
            return Ok(None);
        }
        grid.validate(&self.catalog)?;
        self.check_bet(bet)?;
        Ok(Some(self.start_spin(bet, grid)))
    }

    /// Apply the pending spin
    ///
    /// Returns `Ok(None)` when no spin is running.
    pub fn settle(&mut self) -> FaResult<Option<SpinResult>> {
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };

        let eval = self.paytable.evaluate(&self.catalog, &pending.grid);
        let delta = coin_delta(eval.reward, pending.bet, self.config.base_bet_unit);

        self.state.coins = self.state.coins.saturating_add(delta);
        self.clamp_bet();
        self.persist();

        let result = SpinResult::new(
            pending.spin_id,
            pending.grid,
            pending.bet,
            eval,
            delta,
            self.state.coins,
        );

        log::debug!(
            "{} settled: {} lines, reward {}, +{} coins -> {}",
            result.spin_id,
            result.match_count,
            result.reward,
            result.coin_delta,
            result.balance_after
        );

        self.grid = Some(pending.grid);
        self.stats.record(&result);
        self.last_result = Some(result.clone());
        self.phase.settle();

        Ok(Some(result))
    }

    /// Begin and settle in one call
    pub fn spin(&mut self, bet: u64) -> FaResult<Option<SpinResult>> {
        match self.begin_spin(bet)? {
            Some(_) => self.settle(),
            None => Ok(None),
        }
    }

    /// Spin at the current bet
    pub fn spin_current(&mut self) -> FaResult<Option<SpinResult>> {
        self.spin(self.state.bet)
    }

    /// Begin and settle with a predetermined final grid
    pub fn spin_forced(&mut self, bet: u64, grid: Grid) -> FaResult<Option<SpinResult>> {
        match self.begin_spin_with_grid(bet, grid)? {
            Some(_) => self.settle(),
            None => Ok(None),
        }
    }

    fn check_bet(&self, bet: u64) -> FaResult<()> {
        if bet < self.config.min_bet {
            return Err(FaError::InvalidParam(format!(
                "bet {} is below the minimum of {}",
                bet, self.config.min_bet
            )));
        }
        if bet > self.state.coins {
            return Err(FaError::InsufficientFunds {
                bet,
                balance: self.state.coins,
            });
        }
        Ok(())
    }

    fn start_spin(&mut self, bet: u64, grid: Grid) -> Reveal<Grid> {
        self.spin_count += 1;
        let spin_id = format!("spin-{:06}", self.spin_count);

        self.state.bet = bet;
        self.state.coins -= bet;
        self.clamp_bet();
        self.persist();
        self.phase.try_begin();

        let reveal = self
            .config
            .timing
            .build_reveal(&self.catalog, grid, &mut self.rng);

        log::debug!("{} started: bet {}, balance {}", spin_id, bet, self.state.coins);

        self.pending = Some(PendingSpin {
            spin_id,
            bet,
            grid,
            reveal: reveal.clone(),
        });
        reveal
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DAILY BONUS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Credit the daily bonus once per calendar day
    pub fn claim_daily(&mut self) -> ClaimOutcome {
        if self.phase.is_busy() {
            return ClaimOutcome::Busy;
        }

        let today = self.clock.today();
        if !ClaimStatus::for_day(self.state.last_claim_date, today).is_available() {
            return ClaimOutcome::AlreadyClaimed;
        }

        self.state.coins = self.state.coins.saturating_add(self.config.daily_bonus);
        self.state.last_claim_date = Some(today);
        self.clamp_bet();
        self.persist();
        self.stats.bonuses_claimed += 1;

        log::info!(
            "Daily bonus claimed for {}: +{} -> {}",
            today,
            self.config.daily_bonus,
            self.state.coins
        );

        ClaimOutcome::Credited {
            amount: self.config.daily_bonus,
            balance: self.state.coins,
        }
    }

    pub fn claim_status(&self) -> ClaimStatus {
        ClaimStatus::for_day(self.state.last_claim_date, self.clock.today())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BET & RESET
    // ═══════════════════════════════════════════════════════════════════════════

    /// Change the bet by `delta`, clamped to `[min_bet, max(balance, min_bet)]`
    ///
    /// Returns the new bet, or `None` while a spin is running.
    pub fn adjust_bet(&mut self, delta: i64) -> Option<u64> {
        if self.phase.is_busy() {
            return None;
        }

        let target = if delta >= 0 {
            self.state.bet.saturating_add(delta.unsigned_abs())
        } else {
            self.state.bet.saturating_sub(delta.unsigned_abs())
        };
        self.state.bet = self.config.clamp_bet(target, self.state.coins);
        self.persist();
        Some(self.state.bet)
    }

    /// One `bet_step` up
    pub fn raise_bet(&mut self) -> Option<u64> {
        self.adjust_bet(i64::try_from(self.config.bet_step).unwrap_or(i64::MAX))
    }

    /// One `bet_step` down
    pub fn lower_bet(&mut self) -> Option<u64> {
        self.adjust_bet(-i64::try_from(self.config.bet_step).unwrap_or(i64::MAX))
    }

    /// Forget saved progress and restore defaults
    ///
    /// Returns false (and changes nothing) while a spin is running.
    pub fn reset_state(&mut self) -> bool {
        if self.phase.is_busy() {
            return false;
        }

        self.state = SlotState::new(&self.config);
        self.grid = None;
        self.last_result = None;
        self.stats = SessionStats::default();
        self.phase = EnginePhase::Idle;

        self.save_failed = false;
        self.status = match self.store.delete(SLOT_STORE_KEY) {
            Ok(()) => Some("Slot machine progress cleared.".into()),
            Err(e) => {
                log::warn!("Failed to clear slot machine record: {}", e);
                Some(format!("Could not clear saved slot machine: {}", e))
            }
        };

        log::info!("Slot machine reset to {} coins", self.state.coins);
        true
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE
    // ═══════════════════════════════════════════════════════════════════════════

    fn clamp_bet(&mut self) {
        self.state.bet = self.config.clamp_bet(self.state.bet, self.state.coins);
    }

    /// Flush state; a failed write becomes an advisory status
    fn persist(&mut self) {
        let result = self
            .state
            .to_json()
            .and_then(|json| self.store.set(SLOT_STORE_KEY, &json));

        match result {
            Ok(()) if self.save_failed => {
                log::info!("Slot machine saved again");
                self.save_failed = false;
                self.status = None;
            }
            Ok(()) => {}
            Err(e) => {
                log::warn!("Failed to save slot machine: {}", e);
                self.save_failed = true;
                self.status = Some(format!("Progress could not be saved: {}", e));
            }
        }
    }

    pub fn balance(&self) -> u64 {
        self.state.coins
    }

    pub fn bet(&self) -> u64 {
        self.state.bet
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// Last settled grid
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Reveal of the running spin
    pub fn pending_reveal(&self) -> Option<&Reveal<Grid>> {
        self.pending.as_ref().map(|p| &p.reveal)
    }

    pub fn last_result(&self) -> Option<&SpinResult> {
        self.last_result.as_ref()
    }

    /// Advisory persistence status
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<SymbolCatalog> {
        &self.catalog
    }

    pub fn status(&self) -> SlotStatus {
        SlotStatus {
            balance: self.state.coins,
            bet: self.state.bet,
            phase: self.phase,
            claim: self.claim_status(),
            grid: self.grid,
            last_message: self.last_result.as_ref().map(|r| r.message.clone()),
            status: self.status.clone(),
        }
    }
}
