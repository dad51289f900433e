//! Once-per-day coin bonus

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bonus availability for the current calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    Available,
    Claimed,
}

impl ClaimStatus {
    /// Available unless the last claim happened on `today`
    pub fn for_day(last_claim: Option<NaiveDate>, today: NaiveDate) -> Self {
        match last_claim {
            Some(date) if date == today => ClaimStatus::Claimed,
            _ => ClaimStatus::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ClaimStatus::Available)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::Available => "Daily bonus available",
            ClaimStatus::Claimed => "Daily bonus claimed, come back tomorrow",
        }
    }
}

/// Result of a claim request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimOutcome {
    /// Bonus credited
    Credited { amount: u64, balance: u64 },
    /// Already claimed today; nothing changed
    AlreadyClaimed,
    /// A spin is running; nothing changed
    Busy,
}

impl ClaimOutcome {
    pub fn is_credited(&self) -> bool {
        matches!(self, ClaimOutcome::Credited { .. })
    }
}
