//! Provider configuration from TOML (`[providers.<tag>]` sections)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// One OpenAI-compatible chat-completions endpoint.
///
/// # Example
///
/// ```toml
/// [providers.local]
/// base_url = "http://localhost:11434/v1"
/// api_key_env = ""            # no key needed
/// timeout_secs = 300
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL up to and including the API version (e.g. `https://api.openai.com/v1`)
    pub base_url: String,
    /// Environment variable holding the API key (empty = no key).
    pub api_key_env: String,
    /// HTTP client timeout
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key from the environment, if configured and set.
    pub fn api_key(&self) -> Option<String> {
        if self.api_key_env.trim().is_empty() {
            return None;
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Provider sections keyed by provider tag.
///
/// The `openai` tag is always present, so zero-config runs can reach the
/// public API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileProvidersConfig(pub BTreeMap<String, FileProviderConfig>);

impl Default for FileProvidersConfig {
    fn default() -> Self {
        let mut providers = BTreeMap::new();
        providers.insert("openai".to_string(), FileProviderConfig::default());
        Self(providers)
    }
}

impl FileProvidersConfig {
    pub fn get(&self, tag: &str) -> Option<&FileProviderConfig> {
        self.0.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains_key(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileProviderConfig)> {
        self.0.iter()
    }
}
