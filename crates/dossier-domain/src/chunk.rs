//! Text chunks handed to the extraction collaborator

use serde::{Deserialize, Serialize};

/// A bounded unit of normalized source text with a stable identity
///
/// Evidence quotes are checked against `text` exactly as stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Source document identifier
    pub source_id: String,

    /// Location label inside the source
    pub location: String,

    /// Normalized chunk text
    pub text: String,
}

impl TextChunk {
    /// Create a new chunk
    pub fn new(
        source_id: impl Into<String>,
        location: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            location: location.into(),
            text: text.into(),
        }
    }
}
