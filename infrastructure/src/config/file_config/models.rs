//! Model descriptors from TOML (`[[models]]` array)

use ensemble_domain::{ConfigIssue, ConfigIssueCode, ModelDescriptor, ModelRole};
use serde::{Deserialize, Serialize};

/// One `[[models]]` entry
///
/// # Example
///
/// ```toml
/// [[models]]
/// id = "lead"
/// model = "gpt-4o"
/// role = "primary"
/// capabilities = ["reasoning", "code"]
///
/// [[models]]
/// id = "reviewer"
/// name = "Local reviewer"
/// provider = "local"
/// model = "llama3.1"
/// role = "critic"
/// temperature = 0.2
/// weight = 1.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    pub id: String,
    /// Display name (defaults to `id`)
    pub name: Option<String>,
    pub provider: String,
    /// Backend model name
    pub model: String,
    pub role: String,
    pub capabilities: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub weight: f64,
    pub enabled: bool,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: None,
            provider: "openai".to_string(),
            model: String::new(),
            role: ModelRole::default().to_string(),
            capabilities: Vec::new(),
            temperature: 0.7,
            max_tokens: 1024,
            weight: 1.0,
            enabled: true,
        }
    }
}

impl FileModelConfig {
    /// Parse the role string, falling back to `secondary` on unknown values.
    pub fn parse_role(&self) -> (ModelRole, Vec<ConfigIssue>) {
        match self.role.parse::<ModelRole>() {
            Ok(role) => (role, Vec::new()),
            Err(_) => (
                ModelRole::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: format!("models.{}.role", self.id),
                        value: self.role.clone(),
                        valid_values: ModelRole::all().iter().map(|r| r.to_string()).collect(),
                    },
                    format!(
                        "models.{}.role: unknown value '{}', falling back to 'secondary'",
                        self.id, self.role
                    ),
                )],
            ),
        }
    }

    /// Convert into a domain descriptor.
    ///
    /// Entries with an empty `id` or `model` yield `None` plus an issue.
    pub fn to_descriptor(&self) -> (Option<ModelDescriptor>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        for (field, value) in [("id", &self.id), ("model", &self.model)] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelField {
                        field: field.to_string(),
                    },
                    format!("models: '{}' cannot be empty (entry '{}')", field, self.id),
                ));
            }
        }

        if self.weight < 0.0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NegativeWeight {
                    id: self.id.clone(),
                },
                format!("models.{}.weight: {} is negative", self.id, self.weight),
            ));
        }

        let (role, role_issues) = self.parse_role();
        issues.extend(role_issues);

        if self.id.trim().is_empty() || self.model.trim().is_empty() {
            return (None, issues);
        }

        let mut descriptor = ModelDescriptor::new(self.id.trim(), self.model.trim(), role)
            .with_provider(self.provider.trim())
            .with_capabilities(self.capabilities.iter().cloned())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_weight(self.weight);
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            descriptor = descriptor.with_name(name);
        }
        if !self.enabled {
            descriptor = descriptor.disabled();
        }

        (Some(descriptor), issues)
    }
}
