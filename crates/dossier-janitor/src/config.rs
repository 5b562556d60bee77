//! Configuration for Janitor operations
//!
//! Names the leaves the post-merge sweep writes to.

use crate::JanitorError;
use dossier_domain::Pointer;
use serde::{Deserialize, Serialize};

/// Configuration for the Janitor
///
/// # Examples
///
/// ```
/// use dossier_janitor::JanitorConfig;
///
/// let config = JanitorConfig::default();
/// assert_eq!(config.gap_pointer, "/14_open_questions_and_gaps");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    /// Leaf that receives the synthesized gap note
    pub gap_pointer: String,

    /// Leaf that receives the list of reviewed sources
    pub sources_pointer: String,

    /// Leaf that receives the completion timestamp
    pub timestamp_pointer: String,

    /// Write the completion timestamp
    pub record_timestamp: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            gap_pointer: "/14_open_questions_and_gaps".to_string(),
            sources_pointer: "/document_metadata/sources_reviewed".to_string(),
            timestamp_pointer: "/document_metadata/last_updated".to_string(),
            record_timestamp: true,
        }
    }
}

impl JanitorConfig {
    /// Parsed gap leaf pointer
    pub fn gap_pointer(&self) -> Result<Pointer, JanitorError> {
        parse("gap_pointer", &self.gap_pointer)
    }

    /// Parsed sources leaf pointer
    pub fn sources_pointer(&self) -> Result<Pointer, JanitorError> {
        parse("sources_pointer", &self.sources_pointer)
    }

    /// Parsed timestamp leaf pointer
    pub fn timestamp_pointer(&self) -> Result<Pointer, JanitorError> {
        parse("timestamp_pointer", &self.timestamp_pointer)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), JanitorError> {
        self.gap_pointer()?;
        self.sources_pointer()?;
        self.timestamp_pointer()?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, JanitorError> {
        toml::from_str(toml_str)
            .map_err(|e| JanitorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, JanitorError> {
        toml::to_string_pretty(self)
            .map_err(|e| JanitorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

fn parse(name: &str, raw: &str) -> Result<Pointer, JanitorError> {
    Pointer::parse(raw).map_err(|e| JanitorError::Config(format!("{}: {}", name, e)))
}
