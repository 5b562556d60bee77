//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the compilation engine and
//! infrastructure. Implementations live in other crates.

use crate::{CandidateExtraction, FieldCatalog, TextChunk};

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (dossier-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured output (if supported)
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}

/// Trait for the fact-extraction collaborator
///
/// Given the field catalog and one chunk, propose candidate extractions.
/// Implementations only read their inputs; candidates are untrusted and are
/// validated by the merge engine.
///
/// Implemented by the application layer (dossier-extractor)
pub trait FactExtractor {
    /// Error type for extraction operations
    type Error;

    /// Propose candidate extractions for one chunk
    fn extract(
        &self,
        catalog: &FieldCatalog,
        chunk: &TextChunk,
    ) -> Result<Vec<CandidateExtraction>, Self::Error>;
}
