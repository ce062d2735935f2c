//! Execution parameters: per-run limits.
//!
//! [`ExecutionParams`] groups the static parameters that bound backend calls
//! made by [`OrchestrateUseCase`](crate::use_cases::orchestrate::OrchestrateUseCase).
//! These are application-layer concerns, not collaboration policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits applied to every backend call of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Timeout for each individual backend call, including combination calls.
    /// `None` waits indefinitely (cancellation still applies).
    pub call_timeout: Option<Duration>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            call_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl ExecutionParams {
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }
}
