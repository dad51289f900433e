//! Pack results and the flip/reveal timeline

use fa_core::{Reveal, RevealFrame};
use serde::{Deserialize, Serialize};

use crate::catalog::{Card, Rarity};

/// Face state of one card slot during a reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardFace {
    /// Still face down
    Hidden,
    /// Flipped, artwork not yet shown
    Flipped,
    /// Fully shown
    Revealed,
}

/// Per-card flip and reveal offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackTiming {
    /// Delay before the first card flips (ms)
    pub first_flip_ms: u64,
    /// Gap between consecutive flips (ms)
    pub flip_interval_ms: u64,
    /// Delay from a card's flip to its reveal (ms)
    pub reveal_delay_ms: u64,
}

impl PackTiming {
    /// Card `i` flips at `1000 + 400·i` ms and is revealed 200 ms later
    pub fn normal() -> Self {
        Self {
            first_flip_ms: 1000,
            flip_interval_ms: 400,
            reveal_delay_ms: 200,
        }
    }

    pub fn instant() -> Self {
        Self {
            first_flip_ms: 0,
            flip_interval_ms: 0,
            reveal_delay_ms: 0,
        }
    }

    pub fn flip_at_ms(&self, index: usize) -> u64 {
        let index = u64::try_from(index).unwrap_or(u64::MAX);
        self.first_flip_ms.saturating_add(self.flip_interval_ms.saturating_mul(index))
    }

    pub fn reveal_at_ms(&self, index: usize) -> u64 {
        self.flip_at_ms(index).saturating_add(self.reveal_delay_ms)
    }

    /// Build the reveal for `count` cards
    ///
    /// Each frame is the full face state of the pack. Opening ends when the
    /// last card flips, so the collaborator may settle before the final
    /// reveal frame plays.
    pub fn build_reveal(&self, count: usize) -> Reveal<Vec<CardFace>> {
        let mut events: Vec<(u64, usize, CardFace)> = Vec::with_capacity(count * 2);
        for i in 0..count {
            events.push((self.flip_at_ms(i), i, CardFace::Flipped));
            events.push((self.reveal_at_ms(i), i, CardFace::Revealed));
        }
        // Stable on ties: a flip always precedes its own reveal
        events.sort_by_key(|(at, _, face)| (*at, *face == CardFace::Revealed));

        let mut faces = vec![CardFace::Hidden; count];
        let mut frames = vec![RevealFrame {
            at_ms: 0,
            snapshot: faces.clone(),
        }];
        for (at_ms, index, face) in events {
            if faces[index] < face {
                faces[index] = face;
            }
            frames.push(RevealFrame {
                at_ms,
                snapshot: faces.clone(),
            });
        }

        let settle_at_ms = count.checked_sub(1).map(|last| self.flip_at_ms(last)).unwrap_or(0);
        Reveal::new(frames, settle_at_ms)
    }
}

impl Default for PackTiming {
    fn default() -> Self {
        Self::normal()
    }
}

/// One settled pack opening
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackResult {
    /// Pack ID
    pub pack_id: String,
    /// Cards in draw order
    pub cards: Vec<Card>,
    /// Total packs opened including this one
    pub packs_opened: u64,
    /// Names drawn for the first time in this pack
    pub new_cards: Vec<String>,
}

impl PackResult {
    /// Highest rarity in the pack
    pub fn best_rarity(&self) -> Option<Rarity> {
        self.cards.iter().map(|c| c.rarity).max()
    }

    pub fn count_of(&self, rarity: Rarity) -> usize {
        self.cards.iter().filter(|c| c.rarity == rarity).count()
    }
}
