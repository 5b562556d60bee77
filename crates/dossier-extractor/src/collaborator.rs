//! LLM-backed fact extraction

use crate::error::ExtractorError;
use crate::parser::parse_extractions;
use crate::prompt::{PromptBuilder, RESPONSE_SCHEMA};
use dossier_domain::traits::{FactExtractor, LlmProvider};
use dossier_domain::{CandidateExtraction, FieldCatalog, TextChunk};
use std::fmt::Display;
use tracing::debug;

/// Fact extractor that asks an LLM provider for candidate extractions
pub struct LlmCollaborator<L> {
    llm: L,
}

impl<L> LlmCollaborator<L> {
    /// Create a new collaborator over the given provider
    pub fn new(llm: L) -> Self {
        Self { llm }
    }
}

impl<L> FactExtractor for LlmCollaborator<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Error = ExtractorError;

    fn extract(
        &self,
        catalog: &FieldCatalog,
        chunk: &TextChunk,
    ) -> Result<Vec<CandidateExtraction>, ExtractorError> {
        if catalog.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = PromptBuilder::new(catalog, chunk).build();
        let response = self
            .llm
            .generate_structured(&prompt, RESPONSE_SCHEMA)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        let candidates = parse_extractions(&response)?;
        debug!(
            source = %chunk.source_id,
            location = %chunk.location,
            candidates = candidates.len(),
            "Collaborator responded"
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::Template;
    use dossier_llm::MockProvider;

    fn catalog() -> FieldCatalog {
        Template::from_json_str(
            r#"{"overview": {"name": {"update_rule": "overwrite", "instruction": "Company name"}}}"#,
        )
        .unwrap()
        .catalog()
    }

    #[test]
    fn test_extract_parses_response() {
        let mut mock = MockProvider::default();
        mock.add_response_containing(
            "Acme Oy",
            r#"{"extractions": [{"pointer": "/overview/name", "value": "Acme Oy", "evidence": [{"quote": "Acme Oy"}]}]}"#,
        );
        let collaborator = LlmCollaborator::new(mock.clone());
        let chunk = TextChunk::new("a.txt", "document", "Acme Oy builds boats.");

        let candidates = collaborator.extract(&catalog(), &chunk).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].pointer, "/overview/name");
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_prompt_carries_chunk_and_catalog() {
        let mut mock = MockProvider::default();
        mock.add_response_containing("boats", r#"{"extractions": []}"#);
        let collaborator = LlmCollaborator::new(mock.clone());
        let chunk = TextChunk::new("a.txt", "page 4", "Acme Oy builds boats.");

        collaborator.extract(&catalog(), &chunk).unwrap();

        let prompts = mock.prompts();
        assert!(prompts[0].contains("\"location\":\"page 4\""));
        assert!(prompts[0].contains("/overview/name"));
    }

    #[test]
    fn test_provider_error_is_llm_error() {
        let mut mock = MockProvider::default();
        mock.add_error("boats");
        let collaborator = LlmCollaborator::new(mock);
        let chunk = TextChunk::new("a.txt", "document", "Acme Oy builds boats.");

        let result = collaborator.extract(&catalog(), &chunk);
        assert!(matches!(result, Err(ExtractorError::Llm(_))));
    }

    #[test]
    fn test_default_mock_response_is_malformed() {
        let collaborator = LlmCollaborator::new(MockProvider::default());
        let chunk = TextChunk::new("a.txt", "document", "text");

        let result = collaborator.extract(&catalog(), &chunk);
        assert!(matches!(result, Err(ExtractorError::MalformedResponse(_))));
    }

    #[test]
    fn test_empty_catalog_skips_call() {
        let mock = MockProvider::default();
        let collaborator = LlmCollaborator::new(mock.clone());
        let chunk = TextChunk::new("a.txt", "document", "text");

        let candidates = collaborator.extract(&FieldCatalog::default(), &chunk).unwrap();
        assert!(candidates.is_empty());
        assert_eq!(mock.call_count(), 0);
    }
}
