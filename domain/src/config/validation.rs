//! Structured configuration issues.
//!
//! Loaders collect [`ConfigIssue`]s instead of failing on the first problem
//! so that every mistake in a config file can be reported at once.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field did not match any known variant.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A model entry has an empty id or backend model name.
    EmptyModelField { field: String },
    /// Two model entries share the same id.
    DuplicateModelId { id: String },
    /// A model weight is negative.
    NegativeWeight { id: String },
    /// A model refers to a provider with no `[providers.<tag>]` section.
    UnknownProvider { id: String, provider: String },
    /// Hierarchical topology without exactly one enabled primary.
    PrimaryCount { found: usize },
    /// No model is enabled.
    NoEnabledModels,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Check whether any issues are errors (i.e. fatal).
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
