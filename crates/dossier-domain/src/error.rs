//! Template addressing and loading errors

use thiserror::Error;

/// Errors raised while loading a template or resolving a pointer
///
/// During template loading these are fatal. During merge of untrusted
/// candidates the same errors only cause the candidate to be dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Pointer string is empty or not of the form `/seg/seg`
    #[error("Malformed pointer: '{0}'")]
    MalformedPointer(String),

    /// A path segment does not exist
    #[error("Pointer not found: {0}")]
    PointerNotFound(String),

    /// Pointer resolves to a section where a leaf field was required
    #[error("Pointer does not address a leaf field: {0}")]
    NotALeaf(String),

    /// Pointer resolves to a non-object node
    #[error("Pointer does not resolve to an object: {0}")]
    NotAnObject(String),

    /// A template key cannot be addressed by a pointer
    #[error("Invalid key '{key}' under '{parent}': keys must be non-empty and must not contain '/'")]
    InvalidKey {
        /// Offending key
        key: String,
        /// Pointer of the containing section
        parent: String,
    },

    /// Template file could not be read
    #[error("I/O error: {0}")]
    Io(String),

    /// Template text is not valid JSON
    #[error("JSON parse error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for TemplateError {
    fn from(e: serde_json::Error) -> Self {
        TemplateError::Json(e.to_string())
    }
}

impl From<std::io::Error> for TemplateError {
    fn from(e: std::io::Error) -> Self {
        TemplateError::Io(e.to_string())
    }
}
