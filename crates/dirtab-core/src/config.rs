//! Browser configuration.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading an explicit configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Configuration shared by the scanner, the sessions and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct BrowserConfig {
    /// Path opened in the first tab.
    #[builder(default = "PathBuf::from(\".\")")]
    pub start_path: PathBuf,

    /// Number of entries between two progress signals during a scan.
    #[builder(default = "1000")]
    pub progress_interval: u64,

    /// List entries whose name starts with a dot.
    #[builder(default = "true")]
    pub include_hidden: bool,

    /// Maximum number of open tabs.
    #[builder(default = "10")]
    pub max_tabs: usize,
}

impl BrowserConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.start_path {
            if path.as_os_str().is_empty() {
                return Err("Start path cannot be empty".to_string());
            }
        }
        if self.progress_interval == Some(0) {
            return Err("Progress interval must be greater than zero".to_string());
        }
        if self.max_tabs == Some(0) {
            return Err("At least one tab must be allowed".to_string());
        }
        Ok(())
    }
}

impl BrowserConfig {
    /// Create a new config builder.
    pub fn builder() -> BrowserConfigBuilder {
        BrowserConfigBuilder::default()
    }

    /// Default location of the config file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dirtab").join("config.toml"))
    }

    /// Load the config from the default location, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .and_then(|content| toml::from_str::<Self>(&content).ok())
            .filter(|config| config.check().is_ok())
            .unwrap_or_default()
    }

    /// Load the config from an explicit file, reporting any problem.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.check()?;
        Ok(config)
    }

    /// Validate a config that did not come through the builder.
    pub fn check(&self) -> Result<(), ConfigError> {
        BrowserConfigBuilder::default()
            .start_path(self.start_path.clone())
            .progress_interval(self.progress_interval)
            .max_tabs(self.max_tabs)
            .validate()
            .map_err(|message| ConfigError::Invalid { message })
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            start_path: PathBuf::from("."),
            progress_interval: 1000,
            include_hidden: true,
            max_tabs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = BrowserConfig::builder()
            .start_path("/home/user")
            .progress_interval(250u64)
            .include_hidden(false)
            .build()
            .unwrap();

        assert_eq!(config.start_path, PathBuf::from("/home/user"));
        assert_eq!(config.progress_interval, 250);
        assert!(!config.include_hidden);
        assert_eq!(config.max_tabs, 10);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let built = BrowserConfig::builder().build().unwrap();
        assert_eq!(built, BrowserConfig::default());
    }

    #[test]
    fn test_builder_rejects_zero_interval() {
        let result = BrowserConfig::builder().progress_interval(0u64).build();
        assert!(result.is_err());

        let result = BrowserConfig::builder().max_tabs(0usize).build();
        assert!(result.is_err());
    }
}
