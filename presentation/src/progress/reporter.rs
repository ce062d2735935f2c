//! Progress reporting for orchestration runs

use colored::Colorize;
use ensemble_application::ports::progress::ProgressNotifier;
use ensemble_domain::{Contribution, RunPhase};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Reports progress with one indicatif bar per phase, drawn on stderr
pub struct ProgressReporter {
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_label(phase: RunPhase) -> &'static str {
        match phase {
            RunPhase::Dispatching => "Asking models",
            RunPhase::Combining => "Combining",
            RunPhase::Done => "Done",
            RunPhase::Failed => "Failed",
        }
    }

    fn bar(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.phase_bar
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Status line shown after a contribution arrives
    fn status(contribution: &Contribution) -> String {
        match contribution.failure_kind() {
            None => format!("{} {}", "v".green(), contribution.model_name),
            Some(kind) => format!("{} {} ({})", "x".red(), contribution.model_name, kind),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: RunPhase, total_tasks: usize) {
        let pb = ProgressBar::new(total_tasks as u64);
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_label(phase));
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));

        *self.bar() = Some(pb);
    }

    fn on_contribution(&self, _phase: RunPhase, contribution: &Contribution) {
        if let Some(pb) = self.bar().as_ref() {
            pb.set_message(Self::status(contribution));
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: RunPhase) {
        if let Some(pb) = self.bar().take() {
            if phase == RunPhase::Combining {
                pb.inc(1);
            }
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::{FailureKind, ModelDescriptor, ModelRole};

    #[test]
    fn test_status_marks_failures() {
        colored::control::set_override(false);
        let m = ModelDescriptor::new("a", "gpt", ModelRole::Primary).with_name("Alpha");

        assert_eq!(
            ProgressReporter::status(&Contribution::success(&m, "ok", 1, 0.5)),
            "v Alpha"
        );
        assert_eq!(
            ProgressReporter::status(&Contribution::failure(&m, FailureKind::Timeout, "slow", 1)),
            "x Alpha (timeout)"
        );
    }

    #[test]
    fn test_lifecycle_without_terminal() {
        let reporter = ProgressReporter::new();
        let m = ModelDescriptor::new("a", "gpt", ModelRole::Primary);

        reporter.on_phase_start(RunPhase::Dispatching, 2);
        reporter.on_contribution(RunPhase::Dispatching, &Contribution::success(&m, "ok", 1, 0.5));
        reporter.on_phase_complete(RunPhase::Dispatching);
        assert!(reporter.bar().is_none());

        // contributions outside a phase are ignored
        reporter.on_contribution(RunPhase::Dispatching, &Contribution::success(&m, "ok", 1, 0.5));
    }
}
