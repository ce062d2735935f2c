//! Progress notification port
//!
//! Defines the interface for reporting progress during an orchestration run.

use ensemble_domain::{Contribution, RunPhase};

/// Callback for progress updates during orchestration
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: RunPhase, total_tasks: usize);

    /// Called when one model's contribution is available
    fn on_contribution(&self, phase: RunPhase, contribution: &Contribution);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: RunPhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: RunPhase, _total_tasks: usize) {}
    fn on_contribution(&self, _phase: RunPhase, _contribution: &Contribution) {}
    fn on_phase_complete(&self, _phase: RunPhase) {}
}
