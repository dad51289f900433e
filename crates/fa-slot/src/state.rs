//! Persisted slot state and load-time reconciliation
//!
//! The `slotMachine` record is `{coins, bet, lastClaimDate}`. Each field is
//! checked on its own; a bad field falls back to its default without
//! discarding the others.

use chrono::NaiveDate;
use fa_core::{FaError, FaResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SlotConfig;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Coins, bet and last daily claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotState {
    pub coins: u64,
    pub bet: u64,
    /// Serialized as `YYYY-MM-DD` or `null`
    pub last_claim_date: Option<NaiveDate>,
}

impl SlotState {
    /// Fresh state for a first run
    pub fn new(config: &SlotConfig) -> Self {
        Self {
            coins: config.starting_coins,
            bet: config.clamp_bet(config.min_bet, config.starting_coins),
            last_claim_date: None,
        }
    }

    pub fn to_json(&self) -> FaResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// State recovered from a stored record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSlotState {
    pub state: SlotState,
    /// Fields that fell back to defaults
    pub defaulted: Vec<&'static str>,
    /// Advisory status for the player, `None` for a clean load
    pub status: Option<String>,
}

/// Rebuild slot state from the raw stored text
///
/// Never fails: a missing record yields a fresh state, unreadable JSON yields
/// a fresh state with a status, and bad fields are defaulted one by one.
pub fn reconcile_slot_state(raw: Option<&str>, config: &SlotConfig) -> LoadedSlotState {
    let Some(raw) = raw else {
        return LoadedSlotState {
            state: SlotState::new(config),
            defaulted: Vec::new(),
            status: None,
        };
    };

    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Could not read saved slot state: {}", e);
            return LoadedSlotState {
                state: SlotState::new(config),
                defaulted: vec!["coins", "bet", "lastClaimDate"],
                status: Some("Could not read saved slot machine; starting fresh.".into()),
            };
        }
    };

    match reconcile_value(&value, config) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::warn!("{}", e);
            LoadedSlotState {
                state: SlotState::new(config),
                defaulted: vec!["coins", "bet", "lastClaimDate"],
                status: Some("Saved slot machine was invalid; starting fresh.".into()),
            }
        }
    }
}

/// Per-field reconciliation of a decoded record
///
/// Only a non-object record is an error; every field problem is defaulted.
pub fn reconcile_value(value: &Value, config: &SlotConfig) -> FaResult<LoadedSlotState> {
    let Value::Object(record) = value else {
        return Err(FaError::InvalidPersistedState(
            "slot machine record is not an object".into(),
        ));
    };

    let mut defaulted = Vec::new();

    let coins = match record.get("coins").and_then(Value::as_u64) {
        Some(coins) => coins,
        None => {
            defaulted.push("coins");
            config.starting_coins
        }
    };

    let bet = match record.get("bet").and_then(Value::as_u64) {
        Some(bet) => bet,
        None => {
            defaulted.push("bet");
            config.min_bet
        }
    };
    let bet = config.clamp_bet(bet, coins);

    let last_claim_date = match record.get("lastClaimDate") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => match NaiveDate::parse_from_str(text, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                defaulted.push("lastClaimDate");
                None
            }
        },
        Some(_) => {
            defaulted.push("lastClaimDate");
            None
        }
    };

    let status = if defaulted.is_empty() {
        None
    } else {
        log::warn!("Slot state fields reset to defaults: {}", defaulted.join(", "));
        Some(format!(
            "Some saved slot machine values were invalid and were reset: {}.",
            defaulted.join(", ")
        ))
    };

    Ok(LoadedSlotState {
        state: SlotState {
            coins,
            bet,
            last_claim_date,
        },
        defaulted,
        status,
    })
}
