//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and application
//! types on demand.

mod models;
mod orchestration;
mod output;
mod providers;

pub use models::FileModelConfig;
pub use orchestration::FileOrchestrationConfig;
pub use output::FileOutputConfig;
pub use providers::{FileProviderConfig, FileProvidersConfig};

use ensemble_application::ExecutionParams;
use ensemble_domain::{CollaborationConfig, ConfigIssue, ConfigIssueCode, Topology};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Topology, combination and limits
    pub orchestration: FileOrchestrationConfig,
    /// Ordered model descriptors
    pub models: Vec<FileModelConfig>,
    /// Backend endpoints keyed by provider tag
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Enum fields
        let (topology, topology_issues) = self.orchestration.parse_topology();
        issues.extend(topology_issues);
        issues.extend(self.orchestration.parse_combination().1);

        // 2. Per-model fields
        for entry in &self.models {
            issues.extend(entry.to_descriptor().1);
        }

        // 3. Duplicate ids
        let mut seen = HashSet::new();
        for entry in &self.models {
            let id = entry.id.trim();
            if !id.is_empty() && !seen.insert(id) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateModelId { id: id.to_string() },
                    format!("models: id '{}' is used more than once", id),
                ));
            }
        }

        // 4. Provider references
        for entry in &self.models {
            let provider = entry.provider.trim();
            if !self.providers.contains(provider) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownProvider {
                        id: entry.id.clone(),
                        provider: provider.to_string(),
                    },
                    format!(
                        "models.{}.provider: no [providers.{}] section",
                        entry.id, provider
                    ),
                ));
            }
        }

        // 5. What a run would actually dispatch
        let collaboration = self.to_collaboration_config();
        let enabled = collaboration.enabled_models();
        if enabled.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoEnabledModels,
                "no enabled [[models]] entry: every run will fail",
            ));
        } else if topology == Topology::Hierarchical {
            let found = enabled.iter().filter(|m| m.is_primary()).count();
            if found != 1 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::PrimaryCount { found },
                    format!(
                        "hierarchical topology needs exactly one enabled primary model, found {}",
                        found
                    ),
                ));
            }
        }

        issues
    }

    /// Build the collaboration config; invalid model entries are skipped.
    pub fn to_collaboration_config(&self) -> CollaborationConfig {
        let models = self
            .models
            .iter()
            .filter_map(|entry| entry.to_descriptor().0)
            .collect();

        CollaborationConfig::new(models)
            .with_topology(self.orchestration.parse_topology().0)
            .with_combination(self.orchestration.parse_combination().0)
            .with_max_models(self.orchestration.max_models)
    }

    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default().with_call_timeout(self.orchestration.call_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::{CombinationStrategy, ModelRole, OutputFormat, Severity};
    use std::time::Duration;

    fn parse(toml_str: &str) -> FileConfig {
        let mut config: FileConfig = toml::from_str(toml_str).unwrap();
        // figment merges this default in; plain toml parsing does not
        config
            .providers
            .0
            .entry("openai".to_string())
            .or_default();
        config
    }

    #[test]
    fn test_deserialize_full_config() {
        let config = parse(
            r#"
[orchestration]
topology = "hierarchical"
combination = "synthesis"
max_models = 3
call_timeout_secs = 30

[[models]]
id = "lead"
model = "gpt-4o"
role = "primary"

[[models]]
id = "critic"
model = "llama3.1"
provider = "local"
role = "critic"

[providers.local]
base_url = "http://localhost:11434/v1"
api_key_env = ""

[output]
format = "full"
"#,
        );

        assert!(config.validate().is_empty());

        let collaboration = config.to_collaboration_config();
        assert_eq!(collaboration.topology, Topology::Hierarchical);
        assert_eq!(collaboration.combination, CombinationStrategy::Synthesis);
        assert_eq!(collaboration.max_models, 3);
        assert_eq!(collaboration.models.len(), 2);
        assert_eq!(collaboration.models[1].role, ModelRole::Critic);

        assert_eq!(
            config.to_execution_params().call_timeout,
            Some(Duration::from_secs(30))
        );
        assert_eq!(config.output.format, Some(OutputFormat::Full));
    }

    #[test]
    fn test_default_config_warns_no_models() {
        let issues = FileConfig::default().validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].code, ConfigIssueCode::NoEnabledModels);
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let config = parse(
            r#"
[orchestration]
combination = "blend"

[[models]]
id = "a"
model = "m"

[[models]]
id = "a"
model = "m2"
provider = "nowhere"
weight = -1.0
"#,
        );

        let issues = config.validate();
        assert!(ConfigIssue::has_errors(&issues));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::InvalidEnumValue { field, .. } if field == "orchestration.combination"
        )));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::DuplicateModelId { id } if id == "a"
        )));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::UnknownProvider { provider, .. } if provider == "nowhere"
        )));
        assert!(
            issues
                .iter()
                .any(|i| matches!(i.code, ConfigIssueCode::NegativeWeight { .. }))
        );
    }

    #[test]
    fn test_hierarchical_primary_count() {
        let config = parse(
            r#"
[orchestration]
topology = "hierarchical"

[[models]]
id = "a"
model = "m"
role = "primary"

[[models]]
id = "b"
model = "m"
role = "primary"
"#,
        );

        let issues = config.validate();
        assert!(issues.iter().any(|i| i.code == ConfigIssueCode::PrimaryCount { found: 2 }));
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = parse("[orchestration]\ncall_timeout_secs = 0\n");
        assert!(config.to_execution_params().call_timeout.is_none());
    }
}
