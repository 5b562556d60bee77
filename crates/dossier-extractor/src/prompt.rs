//! Prompt construction for field extraction

use dossier_domain::{FieldCatalog, TextChunk};
use serde_json::json;

/// System instructions sent with every extraction call
pub const SYSTEM_PROMPT: &str = "You are an analyst extracting facts for a due diligence report. \
Only extract information that is explicitly present in the provided source text. \
Do not guess, infer, or use outside knowledge. \
Every extracted item MUST include one or more exact quotes copied verbatim from the source text. \
If you cannot support a claim with an exact quote, do not output it. \
Return strictly valid JSON only (no markdown).";

/// JSON schema hint passed to structured generation
pub const RESPONSE_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "extractions": {
      "type": "array",
      "items": {
        "type": "object",
        "properties": {
          "pointer": {"type": "string"},
          "value": {"type": "string"},
          "evidence": {
            "type": "array",
            "items": {
              "type": "object",
              "properties": {
                "quote": {"type": "string"},
                "location": {"type": "string"}
              },
              "required": ["quote"]
            }
          }
        },
        "required": ["pointer", "value", "evidence"]
      }
    }
  },
  "required": ["extractions"]
}"#;

const TASK: &str =
    "Extract only relevant info from the source for the specified master document fields.";

const RULES: [&str; 4] = [
    "Only include fields that have relevant info in the source text.",
    "Use the pointer values exactly as provided.",
    "Evidence quotes must be exact substrings from the source text.",
    "If nothing relevant exists, return {\"extractions\": []}.",
];

/// Builds the user payload for one extraction call
pub struct PromptBuilder<'a> {
    catalog: &'a FieldCatalog,
    chunk: &'a TextChunk,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(catalog: &'a FieldCatalog, chunk: &'a TextChunk) -> Self {
        Self { catalog, chunk }
    }

    /// Build the JSON payload
    pub fn payload(&self) -> serde_json::Value {
        json!({
            "task": TASK,
            "source": {
                "file": self.chunk.source_id,
                "location": self.chunk.location,
                "text": self.chunk.text,
            },
            "fields": self.catalog,
            "output_format": {
                "extractions": [{
                    "pointer": self
                        .catalog
                        .entries()
                        .first()
                        .map(|e| e.pointer.to_string())
                        .unwrap_or_else(|| "/section/field".to_string()),
                    "value": "<factual text strictly supported by quotes>",
                    "evidence": [{
                        "quote": "<exact substring from source text>",
                        "location": "<use given location>"
                    }]
                }]
            },
            "rules": RULES,
        })
    }

    /// Build the complete user prompt
    pub fn build(&self) -> String {
        self.payload().to_string()
    }
}
