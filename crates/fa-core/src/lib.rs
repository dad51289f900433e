//! fa-core: Shared types, traits, and utilities for Folio Arcade
//!
//! This crate provides the foundations both mini-game engines build on:
//! the error type, weighted random draws, the persistent key-value store,
//! the calendar clock, and the `Idle → Running → Settled` phase machine with
//! its reveal timeline.

mod clock;
mod error;
mod phase;
mod reveal;
mod store;
mod weighted;

pub use clock::*;
pub use error::*;
pub use phase::*;
pub use reveal::*;
pub use store::*;
pub use weighted::*;
