//! Candidate validation and merge logic

use crate::ValidationConfig;
use dossier_domain::{
    CandidateExtraction, EvidenceRecord, Field, OutputDocument, Pointer, Template,
    TemplateError, TextChunk,
};
use serde::Serialize;
use std::fmt;

/// Reasons for rejecting a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Pointer is empty or not of the form `/a/b`
    MalformedPointer,

    /// Pointer does not exist in the template
    PointerNotFound,

    /// Pointer addresses a section or a literal, not a leaf
    NotALeaf,

    /// Target leaf is locked
    LockedFieldWrite,

    /// No evidence entries were supplied
    MissingEvidence,

    /// No evidence quote appears verbatim in the chunk
    UnsupportedEvidence,

    /// Value absent or blank after trimming
    EmptyValue,

    /// Value exceeds the configured maximum length
    ValueTooLong,
}

impl RejectionReason {
    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::MalformedPointer => "malformed_pointer",
            RejectionReason::PointerNotFound => "pointer_not_found",
            RejectionReason::NotALeaf => "not_a_leaf",
            RejectionReason::LockedFieldWrite => "locked_field_write",
            RejectionReason::MissingEvidence => "missing_evidence",
            RejectionReason::UnsupportedEvidence => "unsupported_evidence",
            RejectionReason::EmptyValue => "empty_value",
            RejectionReason::ValueTooLong => "value_too_long",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dropped candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Pointer as proposed by the collaborator
    pub pointer: String,

    /// First failing check
    pub reason: RejectionReason,
}

/// Result of merging one chunk's candidates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Values actually merged
    pub accepted: usize,

    /// Evidence records appended to leaves
    pub evidence_recorded: usize,

    /// Evidence entries dropped because their quote was not found verbatim
    pub evidence_dropped: usize,

    /// Candidates dropped, in proposal order
    pub rejections: Vec<Rejection>,
}

impl MergeOutcome {
    /// Fold another outcome into this one
    pub fn absorb(&mut self, other: MergeOutcome) {
        self.accepted += other.accepted;
        self.evidence_recorded += other.evidence_recorded;
        self.evidence_dropped += other.evidence_dropped;
        self.rejections.extend(other.rejections);
    }
}

/// A candidate that passed every check
struct Admitted<'c> {
    pointer: Pointer,
    value: &'c str,
    quotes: Vec<&'c str>,
}

/// The Gatekeeper validates candidates before they touch the document
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate one chunk's candidates and merge the survivors
    ///
    /// Candidates are processed in order. A rejected candidate leaves the
    /// document untouched; nothing here returns an error.
    ///
    /// # Arguments
    ///
    /// * `document` - Output tree built from `template`
    /// * `template` - Authority for addressing and update rules
    /// * `chunk` - The text the candidates were extracted from
    /// * `candidates` - Untrusted proposals from the collaborator
    pub fn merge(
        &self,
        document: &mut OutputDocument,
        template: &Template,
        chunk: &TextChunk,
        candidates: &[CandidateExtraction],
    ) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for candidate in candidates {
            let admitted = match self.check(template, chunk, candidate, &mut outcome) {
                Ok(admitted) => admitted,
                Err(reason) => {
                    tracing::debug!(
                        pointer = %candidate.pointer,
                        %reason,
                        source = %chunk.source_id,
                        location = %chunk.location,
                        "Rejected candidate"
                    );
                    outcome.rejections.push(Rejection {
                        pointer: candidate.pointer.clone(),
                        reason,
                    });
                    continue;
                }
            };

            match self.apply(document, template, chunk, &admitted) {
                Ok((merged, recorded)) => {
                    if merged {
                        outcome.accepted += 1;
                    }
                    outcome.evidence_recorded += recorded;
                    tracing::debug!(
                        pointer = %admitted.pointer,
                        merged,
                        evidence = recorded,
                        "Merged candidate"
                    );
                }
                Err(reason) => outcome.rejections.push(Rejection {
                    pointer: candidate.pointer.clone(),
                    reason,
                }),
            }
        }

        outcome
    }

    /// Run the rejection pipeline; the first failing check wins
    fn check<'c>(
        &self,
        template: &Template,
        chunk: &TextChunk,
        candidate: &'c CandidateExtraction,
        outcome: &mut MergeOutcome,
    ) -> Result<Admitted<'c>, RejectionReason> {
        // 1. Well-formed pointer
        let pointer =
            Pointer::parse(&candidate.pointer).map_err(|_| RejectionReason::MalformedPointer)?;

        // 2. Resolves to a leaf in the template
        let field = template.resolve_field(&pointer).map_err(addressing_reason)?;

        // 3. Not locked
        if field.update_rule().is_locked() {
            return Err(RejectionReason::LockedFieldWrite);
        }

        // 4. Evidence supplied
        if candidate.evidence.is_empty() {
            return Err(RejectionReason::MissingEvidence);
        }

        // 5. Verbatim quotes, dropped individually
        let mut quotes: Vec<&str> = Vec::with_capacity(candidate.evidence.len());
        for claimed in &candidate.evidence {
            if self.quote_supported(&claimed.quote, &chunk.text) {
                quotes.push(claimed.quote.as_str());
            } else {
                outcome.evidence_dropped += 1;
                tracing::debug!(
                    pointer = %pointer,
                    quote = %claimed.quote,
                    "Dropped evidence not found in chunk"
                );
            }
        }
        if quotes.is_empty() {
            return Err(RejectionReason::UnsupportedEvidence);
        }

        // 6. Non-empty value within bounds
        let value = candidate.value.as_deref().map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(RejectionReason::EmptyValue);
        }
        if let Some(max) = self.config.max_value_chars {
            if value.chars().count() > max {
                return Err(RejectionReason::ValueTooLong);
            }
        }

        Ok(Admitted {
            pointer,
            value,
            quotes,
        })
    }

    /// Length limits apply to the trimmed quote; the match is on the quote as given
    fn quote_supported(&self, quote: &str, text: &str) -> bool {
        let trimmed = quote.trim();
        !trimmed.is_empty()
            && trimmed.chars().count() >= self.config.min_quote_chars
            && text.contains(quote)
    }

    /// Record evidence then apply the value; returns (merged, evidence recorded)
    fn apply(
        &self,
        document: &mut OutputDocument,
        template: &Template,
        chunk: &TextChunk,
        admitted: &Admitted<'_>,
    ) -> Result<(bool, usize), RejectionReason> {
        let rule = template
            .resolve_field(&admitted.pointer)
            .map(Field::update_rule)
            .map_err(addressing_reason)?
            .clone();

        let target = document
            .resolve_field_mut(&admitted.pointer)
            .map_err(addressing_reason)?;
        // A leaf without slots was never opened for writing
        let slots = target
            .slots_mut()
            .ok_or(RejectionReason::LockedFieldWrite)?;

        let mut recorded = 0;
        for quote in &admitted.quotes {
            let record = EvidenceRecord::new(chunk.source_id.as_str(), chunk.location.as_str(), *quote);
            if slots.record_evidence(record) {
                recorded += 1;
            }
        }

        let merged = slots.apply_value(&rule, admitted.value, self.config.append_policy);
        Ok((merged, recorded))
    }
}

fn addressing_reason(error: TemplateError) -> RejectionReason {
    match error {
        TemplateError::MalformedPointer(_) => RejectionReason::MalformedPointer,
        TemplateError::NotALeaf(_) | TemplateError::NotAnObject(_) => RejectionReason::NotALeaf,
        _ => RejectionReason::PointerNotFound,
    }
}
