//! Gatekeeper configuration

use crate::GatekeeperError;
use dossier_domain::AppendPolicy;
use serde::{Deserialize, Serialize};

/// Configuration for validation rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Duplicate handling for append fields
    pub append_policy: AppendPolicy,

    /// Quotes shorter than this (in characters) count as unsupported
    pub min_quote_chars: usize,

    /// Values longer than this (in characters) are rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value_chars: Option<usize>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            append_policy: AppendPolicy::DedupeExact,
            min_quote_chars: 1,
            max_value_chars: None,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (keep every appended value)
    pub fn permissive() -> Self {
        Self {
            append_policy: AppendPolicy::KeepAll,
            min_quote_chars: 1,
            max_value_chars: None,
        }
    }

    /// Create a strict configuration (substantial quotes, bounded values)
    pub fn strict() -> Self {
        Self {
            append_policy: AppendPolicy::DedupeExact,
            min_quote_chars: 8,
            max_value_chars: Some(2_000),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.min_quote_chars == 0 {
            return Err(GatekeeperError::Config(
                "min_quote_chars must be greater than 0".to_string(),
            ));
        }
        if self.max_value_chars == Some(0) {
            return Err(GatekeeperError::Config(
                "max_value_chars must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, GatekeeperError> {
        toml::from_str(toml_str)
            .map_err(|e| GatekeeperError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, GatekeeperError> {
        toml::to_string_pretty(self)
            .map_err(|e| GatekeeperError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
