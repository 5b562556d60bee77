//! Evidence records (provenance for merged values)

use serde::{Deserialize, Serialize};

/// A verbatim quote tying a merged value to the chunk it came from
///
/// Invariant: `quote` is an exact contiguous substring of the normalized text
/// of the chunk identified by `(source_id, location)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Source document identifier (file name)
    #[serde(alias = "source_file")]
    pub source_id: String,

    /// Location label inside the source (e.g. "page 3, chunk 2")
    #[serde(alias = "source_location")]
    pub location: String,

    /// Exact quote from the chunk text
    pub quote: String,
}

impl EvidenceRecord {
    /// Create a new evidence record
    pub fn new(
        source_id: impl Into<String>,
        location: impl Into<String>,
        quote: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            location: location.into(),
            quote: quote.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_legacy_key_names() {
        let json = r#"{"source_file": "deck.pdf", "source_location": "page 2", "quote": "ARR $1M"}"#;
        let record: EvidenceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, EvidenceRecord::new("deck.pdf", "page 2", "ARR $1M"));
    }

    #[test]
    fn test_serializes_canonical_key_names() {
        let record = EvidenceRecord::new("a.txt", "document", "q");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["source_id"], "a.txt");
        assert_eq!(value["location"], "document");
        assert!(value.get("source_file").is_none());
    }
}
