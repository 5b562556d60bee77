//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required credential absent
    #[error("{0} missing (set it in the environment or a .env file)")]
    MissingCredential(&'static str),

    /// Template could not be loaded
    #[error("Template error: {0}")]
    Template(#[from] dossier_domain::TemplateError),

    /// Provider construction failed
    #[error("LLM error: {0}")]
    Llm(#[from] dossier_llm::LlmError),

    /// Compile pipeline error
    #[error("Extractor error: {0}")]
    Extractor(#[from] dossier_extractor::ExtractorError),

    /// Sweep error
    #[error("Janitor error: {0}")]
    Janitor(#[from] dossier_janitor::JanitorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
