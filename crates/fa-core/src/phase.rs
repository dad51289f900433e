//! Engine phase machine
//!
//! Both engines run `Idle → Running → Settled`. A request that arrives while
//! `Running` is a silent no-op; `Settled` accepts the next request like `Idle`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnginePhase {
    /// Nothing has happened yet this session
    #[default]
    Idle,
    /// Outcome decided, reveal in progress, state not yet settled
    Running,
    /// Last outcome applied
    Settled,
}

impl EnginePhase {
    /// Enter `Running`; returns false (and stays put) if already running
    pub fn try_begin(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        *self = EnginePhase::Running;
        true
    }

    /// Leave `Running` for `Settled`; returns false if nothing was running
    pub fn settle(&mut self) -> bool {
        if !self.is_busy() {
            return false;
        }
        *self = EnginePhase::Settled;
        true
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, EnginePhase::Running)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnginePhase::Idle => "idle",
            EnginePhase::Running => "running",
            EnginePhase::Settled => "settled",
        }
    }
}
