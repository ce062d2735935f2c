//! Orchestration settings from TOML (`[orchestration]` section)

use ensemble_domain::{CombinationStrategy, ConfigIssue, ConfigIssueCode, Topology};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Raw orchestration configuration from TOML
///
/// # Example
///
/// ```toml
/// [orchestration]
/// topology = "hierarchical"
/// combination = "synthesis"
/// max_models = 3
/// call_timeout_secs = 60     # 0 disables the per-call timeout
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    pub topology: String,
    pub combination: String,
    /// Cap on dispatched models (0 = no cap)
    pub max_models: usize,
    pub call_timeout_secs: u64,
}

impl Default for FileOrchestrationConfig {
    fn default() -> Self {
        Self {
            topology: Topology::default().to_string(),
            combination: CombinationStrategy::default().to_string(),
            max_models: 5,
            call_timeout_secs: 120,
        }
    }
}

impl FileOrchestrationConfig {
    /// Parse `topology`, falling back to the default on unknown values.
    pub fn parse_topology(&self) -> (Topology, Vec<ConfigIssue>) {
        parse_enum("orchestration.topology", &self.topology, &Topology::all())
    }

    /// Parse `combination`, falling back to the default on unknown values.
    pub fn parse_combination(&self) -> (CombinationStrategy, Vec<ConfigIssue>) {
        parse_enum(
            "orchestration.combination",
            &self.combination,
            &CombinationStrategy::all(),
        )
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_secs > 0).then(|| Duration::from_secs(self.call_timeout_secs))
    }
}

fn parse_enum<T>(field: &str, value: &str, all: &[T]) -> (T, Vec<ConfigIssue>)
where
    T: FromStr + Default + std::fmt::Display,
{
    match value.parse::<T>() {
        Ok(parsed) => (parsed, Vec::new()),
        Err(_) => {
            let fallback = T::default();
            let issue = ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    valid_values: all.iter().map(|v| v.to_string()).collect(),
                },
                format!(
                    "{}: unknown value '{}', falling back to '{}'",
                    field, value, fallback
                ),
            );
            (fallback, vec![issue])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileOrchestrationConfig::default();
        assert_eq!(config.parse_topology().0, Topology::Parallel);
        assert_eq!(config.parse_combination().0, CombinationStrategy::Merge);
        assert_eq!(config.call_timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_parse_values() {
        let config = FileOrchestrationConfig {
            topology: "Voting".to_string(),
            combination: "critique-then-improve".to_string(),
            max_models: 0,
            call_timeout_secs: 0,
        };
        assert_eq!(config.parse_topology().0, Topology::Voting);
        assert_eq!(
            config.parse_combination().0,
            CombinationStrategy::CritiqueThenImprove
        );
        assert!(config.call_timeout().is_none());
    }

    #[test]
    fn test_unknown_topology_reports_issue() {
        let config = FileOrchestrationConfig {
            topology: "round-robin".to_string(),
            ..Default::default()
        };
        let (topology, issues) = config.parse_topology();
        assert_eq!(topology, Topology::Parallel);
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::InvalidEnumValue { field, valid_values, .. }
                if field == "orchestration.topology" && valid_values.len() == 4
        ));
    }
}
