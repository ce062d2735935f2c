//! Domain error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that end an orchestration run without a usable answer.
///
/// Serializable so it can travel inside a
/// [`ResponseEnvelope`](crate::orchestration::value_objects::ResponseEnvelope).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum OrchestrationError {
    #[error("No enabled models configured")]
    NoEnabledModels,

    #[error("No primary model configured for hierarchical collaboration")]
    NoPrimaryModel,

    #[error("Hierarchical collaboration requires exactly one primary model, found {0}")]
    MultiplePrimaryModels(usize),

    #[error("All models failed to respond")]
    AllModelsFailed,

    #[error("Operation cancelled")]
    Cancelled,
}

impl OrchestrationError {
    /// Whether this error was raised before any backend call was made
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            OrchestrationError::NoEnabledModels
                | OrchestrationError::NoPrimaryModel
                | OrchestrationError::MultiplePrimaryModels(_)
        )
    }

    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrchestrationError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            OrchestrationError::NoEnabledModels.to_string(),
            "No enabled models configured"
        );
        assert_eq!(
            OrchestrationError::MultiplePrimaryModels(2).to_string(),
            "Hierarchical collaboration requires exactly one primary model, found 2"
        );
    }

    #[test]
    fn test_configuration_errors() {
        assert!(OrchestrationError::NoEnabledModels.is_configuration_error());
        assert!(OrchestrationError::NoPrimaryModel.is_configuration_error());
        assert!(!OrchestrationError::AllModelsFailed.is_configuration_error());
        assert!(OrchestrationError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_serialized_kind_tag() {
        let json = serde_json::to_value(OrchestrationError::NoEnabledModels).unwrap();
        assert_eq!(json["kind"], "no_enabled_models");
    }
}
