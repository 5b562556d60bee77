//! Candidate extractions proposed by the fact-extraction collaborator
//!
//! Candidates are untrusted. They have passed shape validation in the
//! response parser but none of the semantic checks of the merge engine.

/// A proposed value for one field, with the quotes claimed to support it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateExtraction {
    /// Pointer string as proposed (not yet validated)
    pub pointer: String,

    /// Proposed value, `None` if the collaborator omitted it
    pub value: Option<String>,

    /// Claimed supporting quotes
    pub evidence: Vec<ClaimedEvidence>,
}

/// A quote the collaborator claims supports a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedEvidence {
    /// Claimed verbatim quote (empty if the collaborator sent a non-string)
    pub quote: String,

    /// Location the collaborator reported, informational only
    pub location: Option<String>,
}

impl CandidateExtraction {
    /// Create a candidate with a value and one supporting quote
    pub fn new(
        pointer: impl Into<String>,
        value: impl Into<String>,
        quote: impl Into<String>,
    ) -> Self {
        Self {
            pointer: pointer.into(),
            value: Some(value.into()),
            evidence: vec![ClaimedEvidence::new(quote)],
        }
    }

    /// Add another supporting quote
    pub fn with_quote(mut self, quote: impl Into<String>) -> Self {
        self.evidence.push(ClaimedEvidence::new(quote));
        self
    }
}

impl ClaimedEvidence {
    /// Create claimed evidence without a location
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            location: None,
        }
    }
}
