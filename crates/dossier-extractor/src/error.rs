//! Error types for the Extractor

use dossier_domain::TemplateError;
use dossier_janitor::JanitorError;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Extraction timeout
    #[error("Extraction timeout")]
    Timeout,

    /// Blocking task failed to complete
    #[error("Task error: {0}")]
    Task(String),

    /// Collaborator response could not be parsed
    #[error("Malformed collaborator response: {0}")]
    MalformedResponse(String),

    /// Reader cannot handle this file type
    #[error("Unsupported source format: {0}")]
    UnsupportedSourceFormat(String),

    /// Source could not be read
    #[error("Failed to read {path}: {message}")]
    SourceRead {
        /// Offending path
        path: String,
        /// Underlying error
        message: String,
    },

    /// Template error
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Post-merge sweep error
    #[error(transparent)]
    Janitor(#[from] JanitorError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
