//! Reveal timing for spins

use fa_core::{FaError, FaResult, Reveal, RevealFrame};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::paytable::Grid;
use crate::symbols::SymbolCatalog;

/// Timing profile for the tumble animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimingProfile {
    /// Site timing
    Normal,
    /// Half-length tumble
    Turbo,
    /// No tumble frames, settle immediately (tests, CLI)
    Instant,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::Normal
    }
}

/// Tumble frames followed by the final grid, then a settle delay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTiming {
    /// Random grids shown before the final grid
    pub tumble_frames: u32,
    /// Time between frames (ms)
    pub frame_interval_ms: u64,
    /// Delay between the final grid and settlement (ms)
    pub settle_delay_ms: u64,
}

impl SpinTiming {
    /// 20 tumbles at 80 ms, settle 500 ms after the final grid
    pub fn normal() -> Self {
        Self {
            tumble_frames: 20,
            frame_interval_ms: 80,
            settle_delay_ms: 500,
        }
    }

    pub fn turbo() -> Self {
        Self {
            tumble_frames: 10,
            frame_interval_ms: 50,
            settle_delay_ms: 200,
        }
    }

    pub fn instant() -> Self {
        Self {
            tumble_frames: 0,
            frame_interval_ms: 0,
            settle_delay_ms: 0,
        }
    }

    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
        }
    }

    pub fn validate(&self) -> FaResult<()> {
        if self.tumble_frames > 0 && self.frame_interval_ms == 0 {
            return Err(FaError::Config(
                "frame_interval_ms must be positive when tumble_frames > 0".into(),
            ));
        }
        Ok(())
    }

    /// Offset at which the final grid is shown
    pub fn final_frame_ms(&self) -> u64 {
        u64::from(self.tumble_frames).saturating_mul(self.frame_interval_ms)
    }

    /// Offset at which the spin should be settled
    pub fn settle_at_ms(&self) -> u64 {
        self.final_frame_ms().saturating_add(self.settle_delay_ms)
    }

    /// Build the reveal for an already decided grid
    ///
    /// Tumble snapshots are cosmetic draws from the same catalog; the last
    /// frame is always `final_grid`.
    pub fn build_reveal<R: Rng>(
        &self,
        catalog: &SymbolCatalog,
        final_grid: Grid,
        rng: &mut R,
    ) -> Reveal<Grid> {
        let mut frames: Vec<RevealFrame<Grid>> = (0..self.tumble_frames)
            .map(|i| RevealFrame {
                at_ms: u64::from(i).saturating_mul(self.frame_interval_ms),
                snapshot: Grid::draw(catalog, rng),
            })
            .collect();

        frames.push(RevealFrame {
            at_ms: self.final_frame_ms(),
            snapshot: final_grid,
        });

        Reveal::new(frames, self.settle_at_ms())
    }
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self::normal()
    }
}
