//! # fa-slot — Slot machine payout engine for Folio Arcade
//!
//! A 3×3 slot machine with weighted symbol draws, eight paylines, a full-board
//! jackpot and a once-per-day coin bonus. Coins, bet and the last claim date
//! survive restarts through a `KeyValueStore`.
//!
//! ## Architecture
//!
//! ```text
//! SlotEngine
//!     │
//!     ├── SlotConfig (coins, bet limits, bonuses, timing)
//!     ├── SymbolCatalog (payouts, weights, tiers) ── Arc, injected
//!     ├── Paylines (3 rows, 3 columns, 2 diagonals)
//!     └── KeyValueStore + Clock ── Arc, injected
//!           │
//!           v
//!     begin_spin → Reveal<Grid> → settle → SpinResult
//! ```

pub mod config;
pub mod daily;
pub mod engine;
pub mod paytable;
pub mod spin;
pub mod state;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use daily::*;
pub use engine::*;
pub use paytable::*;
pub use spin::*;
pub use state::*;
pub use symbols::*;
pub use timing::*;
