//! Configuration management for the CLI.
//!
//! Settings come from an optional TOML file; command-line flags and the
//! environment are applied on top by the commands.

use crate::error::{CliError, Result};
use dossier_extractor::ExtractorConfig;
use dossier_gatekeeper::ValidationConfig;
use dossier_janitor::JanitorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider settings
    pub openai: OpenAiSettings,

    /// Reading, chunking and dispatch
    pub extractor: ExtractorConfig,

    /// Merge validation rules
    pub validation: ValidationConfig,

    /// Post-merge sweep targets
    pub janitor: JanitorConfig,
}

/// Provider settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// Model identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// HTTP timeout per request (seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Attempts per request, including the first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".dossier").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one the default path is used if
    /// present, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        tracing::debug!(path = %path.display(), "Loading config");
        let contents = fs::read_to_string(&path)?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.extractor
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        self.validation
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        self.janitor
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        if self.openai.timeout_secs == Some(0) {
            return Err(CliError::Config(
                "openai.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
