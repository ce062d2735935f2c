//! Orchestration run lifecycle

use serde::{Deserialize, Serialize};

/// Phase of an orchestration run
///
/// ```text
/// Dispatching ──▶ Combining ──▶ Done
///      │              │
///      └──────────────┴──▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Backend calls are in flight
    Dispatching,
    /// Contributions are being reduced to a final answer
    Combining,
    Done,
    Failed,
}

impl RunPhase {
    pub fn as_str(&self) -> &str {
        match self {
            RunPhase::Dispatching => "dispatching",
            RunPhase::Combining => "combining",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            RunPhase::Dispatching => "Dispatch",
            RunPhase::Combining => "Combination",
            RunPhase::Done => "Done",
            RunPhase::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::Failed)
    }

    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        matches!(
            (self, next),
            (RunPhase::Dispatching, RunPhase::Combining)
                | (RunPhase::Dispatching, RunPhase::Failed)
                | (RunPhase::Combining, RunPhase::Done)
                | (RunPhase::Combining, RunPhase::Failed)
        )
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tracks the phase of a single run, rejecting illegal transitions.
#[derive(Debug, Clone)]
pub struct RunTracker {
    phase: RunPhase,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self {
            phase: RunPhase::Dispatching,
        }
    }
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Move to `next`, returning `false` (and staying put) if the move is illegal.
    pub fn advance(&mut self, next: RunPhase) -> bool {
        if self.phase.can_transition_to(next) {
            self.phase = next;
            true
        } else {
            false
        }
    }
}
