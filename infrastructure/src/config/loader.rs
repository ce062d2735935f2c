//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["ensemble.toml", ".ensemble.toml"];

/// Prefix of environment overrides, e.g. `ENSEMBLE_ORCHESTRATION__TOPOLOGY=voting`
const ENV_PREFIX: &str = "ENSEMBLE_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `ENSEMBLE_`-prefixed environment variables (`__` separates keys)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./ensemble.toml` or `./.ensemble.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/model-ensemble/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let global = Self::global_config_path().filter(|p| p.exists());
        let project = Self::project_config_path();

        Self::figment(global.as_deref(), project.as_deref(), config_path)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// File layers on top of the built-in defaults, lowest priority first.
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        [global, project, explicit]
            .into_iter()
            .flatten()
            .fold(
                Figment::new().merge(Serialized::defaults(FileConfig::default())),
                |figment, path| figment.merge(Toml::file(path)),
            )
    }

    /// Get the global config file path
    ///
    /// `$XDG_CONFIG_HOME/model-ensemble/config.toml` on Linux, the platform
    /// equivalent elsewhere.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("model-ensemble").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(explicit: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./ensemble.toml or ./.ensemble.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", mark, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::Topology;
    use std::fs;

    fn extract(figment: Figment) -> FileConfig {
        figment.extract().unwrap()
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.models.is_empty());
        assert_eq!(config.orchestration.max_models, 5);
        assert!(config.providers.contains("openai"));
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("model-ensemble"));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let result = ConfigLoader::load(Some(missing.as_path()));
        assert!(matches!(result, Err(ConfigError::NotFound(p)) if p == missing));
    }

    #[test]
    fn test_layers_override_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(
            &global,
            "[orchestration]\ntopology = \"voting\"\nmax_models = 2\n",
        )
        .unwrap();
        fs::write(&project, "[orchestration]\ntopology = \"sequential\"\n").unwrap();

        let config = extract(ConfigLoader::figment(Some(global.as_path()), Some(project.as_path()), None));

        assert_eq!(config.orchestration.parse_topology().0, Topology::Sequential);
        // keys absent from the higher layer survive
        assert_eq!(config.orchestration.max_models, 2);
        assert_eq!(config.orchestration.call_timeout_secs, 120);
    }

    #[test]
    fn test_provider_sections_merge_with_default() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.toml");
        fs::write(
            &explicit,
            r#"
[[models]]
id = "local-llama"
model = "llama3.1"
provider = "local"

[providers.local]
base_url = "http://localhost:11434/v1"
api_key_env = ""
"#,
        )
        .unwrap();

        let config = extract(ConfigLoader::figment(None, None, Some(explicit.as_path())));

        assert!(config.providers.contains("openai"));
        assert!(config.providers.contains("local"));
        assert_eq!(config.models.len(), 1);
        assert!(config.validate().iter().all(|i| !matches!(
            i.code,
            ensemble_domain::ConfigIssueCode::UnknownProvider { .. }
        )));
    }

    #[test]
    fn test_explicit_file_wins_over_project() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("project.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&project, "[output]\ncolor = false\nshow_progress = false\n").unwrap();
        fs::write(&explicit, "[output]\ncolor = true\n").unwrap();

        let config = extract(ConfigLoader::figment(None, Some(project.as_path()), Some(explicit.as_path())));

        assert!(config.output.color);
        assert!(!config.output.show_progress);
    }

    #[test]
    fn test_env_overrides_project_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "ensemble.toml",
                "[orchestration]\ntopology = \"sequential\"\nmax_models = 3\n",
            )?;
            jail.set_env("ENSEMBLE_ORCHESTRATION__TOPOLOGY", "voting");

            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;

            assert_eq!(config.orchestration.parse_topology().0, Topology::Voting);
            assert_eq!(config.orchestration.max_models, 3);
            Ok(())
        });
    }
}
