//! Reveal timeline
//!
//! An outcome is decided before anything is shown. The collaborator animates
//! it by polling a `Reveal`: an ordered list of immutable snapshots stamped
//! with their offset from the start, plus the offset at which the engine
//! should be settled.

use serde::{Deserialize, Serialize};

/// One snapshot in a reveal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealFrame<T> {
    /// Offset from reveal start in milliseconds
    pub at_ms: u64,
    pub snapshot: T,
}

/// Timed snapshot sequence ending in the decided outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reveal<T> {
    /// Frames ordered by `at_ms`
    pub frames: Vec<RevealFrame<T>>,
    /// When the collaborator should call `settle()`
    pub settle_at_ms: u64,
}

impl<T> Reveal<T> {
    /// Build from frames; frames are sorted by offset
    pub fn new(mut frames: Vec<RevealFrame<T>>, settle_at_ms: u64) -> Self {
        frames.sort_by_key(|f| f.at_ms);
        Self {
            frames,
            settle_at_ms,
        }
    }

    /// Latest frame whose offset is `<= elapsed_ms`, `None` before the first
    pub fn frame_at(&self, elapsed_ms: u64) -> Option<&RevealFrame<T>> {
        let shown = self.frames.partition_point(|f| f.at_ms <= elapsed_ms);
        shown.checked_sub(1).map(|idx| &self.frames[idx])
    }

    pub fn is_complete(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.settle_at_ms
    }

    pub fn last(&self) -> Option<&RevealFrame<T>> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
