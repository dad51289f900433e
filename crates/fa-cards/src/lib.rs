//! # fa-cards — Card pack probability and collection engine for Folio Arcade
//!
//! Opens 5-card packs drawn from a rarity-weighted catalog and keeps a
//! persistent tally of owned cards and packs opened.
//!
//! ## Architecture
//!
//! ```text
//! CardEngine
//!     │
//!     ├── CardConfig (pack size, rarity weights, reveal timing)
//!     ├── CardCatalog (30 cards, six rarity tiers) ── Arc, injected
//!     └── KeyValueStore ── Arc, injected
//!           │
//!           v
//!     begin_open → Reveal<Vec<CardFace>> → settle → PackResult
//! ```

pub mod catalog;
pub mod collection;
pub mod config;
pub mod dex;
pub mod engine;
pub mod pack;

pub use catalog::*;
pub use collection::*;
pub use config::*;
pub use dex::*;
pub use engine::*;
pub use pack::*;
