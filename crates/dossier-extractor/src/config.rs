//! Configuration for the Extractor

use crate::ExtractorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How source text is divided into collaborator calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One call per source unit, full catalog
    Document,
    /// One call per source unit and top-level section, catalog restricted to that section
    Section,
    /// One call per bounded chunk, full catalog
    #[default]
    Chunk,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Document => "document",
            Granularity::Section => "section",
            Granularity::Chunk => "chunk",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(Granularity::Document),
            "section" => Ok(Granularity::Section),
            "chunk" => Ok(Granularity::Chunk),
            other => Err(format!(
                "unknown granularity '{}' (expected document, section or chunk)",
                other
            )),
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum chunk size (characters)
    pub max_chunk_chars: usize,

    /// Extraction call granularity
    pub granularity: Granularity,

    /// Collaborator calls in flight at once
    pub max_concurrency: usize,

    /// Maximum time for a single extraction call (seconds)
    pub extraction_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.max_chunk_chars == 0 {
            return Err(ExtractorError::Config(
                "max_chunk_chars must be greater than 0".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(ExtractorError::Config(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }
        if self.extraction_timeout_secs == 0 {
            return Err(ExtractorError::Config(
                "extraction_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_chunk_chars: 12_000,
            granularity: Granularity::Chunk,
            max_concurrency: 4,
            extraction_timeout_secs: 180,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: smaller chunks, more parallel calls, shorter timeouts
    pub fn aggressive() -> Self {
        Self {
            max_chunk_chars: 6_000,
            granularity: Granularity::Chunk,
            max_concurrency: 8,
            extraction_timeout_secs: 60,
        }
    }

    /// Lenient preset: larger chunks, fewer parallel calls, longer timeouts
    pub fn lenient() -> Self {
        Self {
            max_chunk_chars: 24_000,
            granularity: Granularity::Chunk,
            max_concurrency: 2,
            extraction_timeout_secs: 300,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
