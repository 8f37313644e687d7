//! CLI configuration management

use crate::error::CliError;
use crate::scenarios::Scenario;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Print JSON unless overridden
    #[serde(default)]
    pub json: bool,
    /// Narrate each step unless overridden
    #[serde(default)]
    pub steps: bool,
    /// Extra scenarios, listed after the built-in ones
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tocc"))
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from `path`, or from the default location
    ///
    /// A missing default file yields the default config. An explicit path
    /// must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        tracing::debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(&path)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content).map_err(|e| match e {
            CliError::Config(msg) => CliError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        toml::from_str(content).map_err(|e| CliError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.json);
        assert!(!config.steps);
        assert!(config.scenarios.is_empty());
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            json = true

            [[scenarios]]
            name = "mine"
            title = "My scenario"
            operations = "r1(x) w2(x) c1 c2"
        "#;
        let config = Config::from_toml(toml).unwrap();
        assert!(config.json);
        assert!(!config.steps);
        assert_eq!(config.scenarios.len(), 1);
        assert_eq!(config.scenarios[0].name, "mine");
        assert_eq!(config.scenarios[0].operations, "r1(x) w2(x) c1 c2");
    }

    #[test]
    fn test_config_serialize() {
        let config = Config {
            steps: true,
            ..Config::default()
        };
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("steps = true"));
        assert_eq!(Config::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn test_config_invalid() {
        assert!(matches!(
            Config::from_toml("json = \"yes\""),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "steps = true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.steps);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(CliError::Config(_))
        ));
    }
}
