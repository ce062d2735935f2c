//! Model descriptor value objects
//!
//! A [`ModelDescriptor`] identifies one generative-text backend and carries
//! the parameters and role it plays in a collaboration.

use serde::{Deserialize, Serialize};

/// Role a model plays within a collaboration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelRole {
    Primary,
    #[default]
    Secondary,
    Specialist,
    Critic,
    Synthesizer,
}

impl ModelRole {
    /// Get the string identifier for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::Primary => "primary",
            ModelRole::Secondary => "secondary",
            ModelRole::Specialist => "specialist",
            ModelRole::Critic => "critic",
            ModelRole::Synthesizer => "synthesizer",
        }
    }

    /// One-sentence statement of what the role is expected to do.
    pub fn statement(&self) -> &'static str {
        match self {
            ModelRole::Primary => {
                "You are the primary responder. Produce a complete, authoritative answer."
            }
            ModelRole::Secondary => {
                "You are a supporting responder. Offer an independent perspective and fill gaps."
            }
            ModelRole::Specialist => {
                "You are a domain specialist. Focus on depth and precision within your expertise."
            }
            ModelRole::Critic => {
                "You are a critic. Identify errors, weak reasoning and omissions, then improve the answer."
            }
            ModelRole::Synthesizer => {
                "You are a synthesizer. Combine multiple viewpoints into one coherent answer."
            }
        }
    }

    pub fn all() -> [ModelRole; 5] {
        [
            ModelRole::Primary,
            ModelRole::Secondary,
            ModelRole::Specialist,
            ModelRole::Critic,
            ModelRole::Synthesizer,
        ]
    }
}

impl std::fmt::Display for ModelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "primary" => Ok(ModelRole::Primary),
            "secondary" => Ok(ModelRole::Secondary),
            "specialist" => Ok(ModelRole::Specialist),
            "critic" => Ok(ModelRole::Critic),
            "synthesizer" | "synthesiser" => Ok(ModelRole::Synthesizer),
            other => Err(format!("unknown model role: {}", other)),
        }
    }
}

/// Configuration identifying one generative-text backend (Value Object)
///
/// Descriptors are owned by the collaboration configuration and stay
/// immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Opaque identity, used as the performance ledger key
    pub id: String,
    /// Human readable display name
    pub name: String,
    /// Backend provider tag (e.g. "openai"), used for routing
    pub provider: String,
    /// Backend model name passed to the provider
    pub model: String,
    pub role: ModelRole,
    #[serde(default)]
    pub capabilities: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Relative weight, only consulted by the voting topology
    pub weight: f64,
    pub enabled: bool,
}

impl ModelDescriptor {
    /// Create an enabled descriptor with neutral generation parameters.
    pub fn new(id: impl Into<String>, model: impl Into<String>, role: ModelRole) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            provider: "openai".to_string(),
            model: model.into(),
            role,
            capabilities: Vec::new(),
            temperature: 0.7,
            max_tokens: 1024,
            weight: 1.0,
            enabled: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the voting weight (negative values are clamped to zero).
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.role == ModelRole::Primary
    }
}

impl std::fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.provider, self.model)
    }
}
