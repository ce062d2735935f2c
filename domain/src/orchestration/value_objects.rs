//! Orchestration value objects - immutable result types for a run.
//!
//! - [`Contribution`] - one model's outcome for one request
//! - [`ContributionOutcome`] - tagged success/failure payload of a contribution
//! - [`ResponseEnvelope`] - the single artifact returned to callers

use crate::core::error::OrchestrationError;
use crate::core::model::ModelDescriptor;
use serde::{Deserialize, Serialize};

/// Why a backend call did not produce content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network, protocol or provider error
    Backend,
    /// The backend answered with empty or whitespace-only text
    EmptyResponse,
    /// The per-call timeout elapsed
    Timeout,
    /// The caller's cancellation token fired
    Cancelled,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Backend => "backend",
            FailureKind::EmptyResponse => "empty_response",
            FailureKind::Timeout => "timeout",
            FailureKind::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload of a [`Contribution`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContributionOutcome {
    Success { content: String },
    Failure { kind: FailureKind, message: String },
}

/// One model's outcome for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub model_id: String,
    pub model_name: String,
    pub outcome: ContributionOutcome,
    pub latency_ms: u64,
    /// Heuristic confidence in `[0, 1]`; always `0` for failures
    pub confidence: f64,
}

impl Contribution {
    /// Creates a successful contribution.
    pub fn success(
        model: &ModelDescriptor,
        content: impl Into<String>,
        latency_ms: u64,
        confidence: f64,
    ) -> Self {
        Self {
            model_id: model.id.clone(),
            model_name: model.name.clone(),
            outcome: ContributionOutcome::Success {
                content: content.into(),
            },
            latency_ms,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Creates a failed contribution with zero confidence.
    pub fn failure(
        model: &ModelDescriptor,
        kind: FailureKind,
        message: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        Self {
            model_id: model.id.clone(),
            model_name: model.name.clone(),
            outcome: ContributionOutcome::Failure {
                kind,
                message: message.into(),
            },
            latency_ms,
            confidence: 0.0,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ContributionOutcome::Success { .. })
    }

    /// The generated text, if the call succeeded.
    pub fn content(&self) -> Option<&str> {
        match &self.outcome {
            ContributionOutcome::Success { content } => Some(content),
            ContributionOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            ContributionOutcome::Success { .. } => None,
            ContributionOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Text suitable for display: content, or a marked failure description.
    pub fn display_text(&self) -> String {
        match &self.outcome {
            ContributionOutcome::Success { content } => content.clone(),
            ContributionOutcome::Failure { kind, message } => {
                format!("[{} failure] {}", kind, message)
            }
        }
    }
}

/// Contents of successful contributions, in order.
pub fn successful_texts(contributions: &[Contribution]) -> Vec<&str> {
    contributions.iter().filter_map(Contribution::content).collect()
}

/// The orchestrator's external result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Final combined answer (empty for failed runs)
    pub content: String,
    /// One entry per dispatched model, in descriptor order
    pub contributions: Vec<Contribution>,
    /// Topology + combination label, e.g. `"parallel+merge"`
    pub strategy: String,
    pub total_time_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OrchestrationError>,
}

impl ResponseEnvelope {
    pub fn completed(
        content: impl Into<String>,
        contributions: Vec<Contribution>,
        strategy: impl Into<String>,
        total_time_ms: u64,
    ) -> Self {
        Self {
            content: content.into(),
            contributions,
            strategy: strategy.into(),
            total_time_ms,
            success: true,
            error: None,
        }
    }

    /// A failed run; configuration failures carry no contributions.
    pub fn failed(
        error: OrchestrationError,
        contributions: Vec<Contribution>,
        strategy: impl Into<String>,
        total_time_ms: u64,
    ) -> Self {
        Self {
            content: String::new(),
            contributions,
            strategy: strategy.into(),
            total_time_ms,
            success: false,
            error: Some(error),
        }
    }

    /// Mean confidence over all contributions (0 when there are none).
    pub fn average_confidence(&self) -> f64 {
        if self.contributions.is_empty() {
            return 0.0;
        }
        self.contributions.iter().map(|c| c.confidence).sum::<f64>()
            / self.contributions.len() as f64
    }

    /// True when the run succeeded but at least one model failed.
    pub fn degraded(&self) -> bool {
        self.success && self.contributions.iter().any(|c| !c.is_success())
    }

    pub fn failed_contributions(&self) -> impl Iterator<Item = &Contribution> {
        self.contributions.iter().filter(|c| !c.is_success())
    }
}
