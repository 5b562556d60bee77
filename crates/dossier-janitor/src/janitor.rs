//! Core Janitor implementation: gap analysis and metadata aggregation

use crate::{JanitorConfig, JanitorError, SweepReport};
use chrono::{DateTime, SecondsFormat, Utc};
use dossier_domain::{
    AppendPolicy, Extracted, FieldSlots, OutputDocument, Pointer, Template, UpdateRule,
};

/// Leading text of the synthesized gap note
pub const GAP_NOTE_PREFIX: &str = "Missing or not evidenced in provided documents for fields: ";

/// Build the single gap note enumerating every missing pointer
pub fn gap_note(gaps: &[Pointer]) -> String {
    let listed: Vec<String> = gaps.iter().map(Pointer::to_string).collect();
    format!("{}{}", GAP_NOTE_PREFIX, listed.join(", "))
}

/// Post-merge sweep over the output document
///
/// # Examples
///
/// ```
/// use dossier_domain::{build_skeleton, Template};
/// use dossier_janitor::Janitor;
///
/// let template = Template::from_json_str(r#"{
///     "document_metadata": {
///         "sources_reviewed": {"update_rule": "append", "instruction": "Sources"}
///     }
/// }"#).unwrap();
/// let mut document = build_skeleton(&template);
///
/// let janitor = Janitor::default_config();
/// let sources = vec!["a.pdf".to_string(), "b.txt".to_string()];
/// assert_eq!(janitor.record_sources(&mut document, &template, &sources), 2);
/// assert_eq!(janitor.record_sources(&mut document, &template, &sources), 0);
/// ```
pub struct Janitor {
    config: JanitorConfig,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        Self { config }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Perform the complete sweep
    ///
    /// 1. Records the reviewed sources and the completion timestamp
    /// 2. Finds every non-locked leaf that is still empty
    /// 3. Writes one gap note listing them
    ///
    /// Metadata goes first so the metadata leaves are not reported as gaps.
    /// Missing or locked target leaves are skipped with a warning.
    pub fn sweep(
        &self,
        document: &mut OutputDocument,
        template: &Template,
        sources: &[String],
    ) -> Result<SweepReport, JanitorError> {
        self.config.validate()?;

        let sources_recorded = self.record_sources(document, template, sources);

        let completed_at = Utc::now();
        if self.config.record_timestamp {
            self.record_timestamp(document, template, completed_at);
        }

        let total_fields = self.considered_fields(template)?.len();
        let gaps = self.find_gaps(document, template)?;
        let gap_note_written = self.write_gap_note(document, template, &gaps)?;

        let report = SweepReport {
            filled_fields: total_fields - gaps.len(),
            total_fields,
            gaps,
            gap_note_written,
            sources_recorded,
            completed_at,
        };

        tracing::info!(
            filled = report.filled_fields,
            total = report.total_fields,
            gaps = report.gaps.len(),
            "Sweep complete"
        );

        Ok(report)
    }

    /// Non-locked leaves that count towards completeness, gap leaf excluded
    pub fn considered_fields(&self, template: &Template) -> Result<Vec<Pointer>, JanitorError> {
        let gap_pointer = self.config.gap_pointer()?;
        Ok(template
            .root()
            .fields()
            .into_iter()
            .filter(|(pointer, field)| !field.update_rule().is_locked() && *pointer != gap_pointer)
            .map(|(pointer, _)| pointer)
            .collect())
    }

    /// Every considered leaf whose value is null, an empty string or an empty list
    ///
    /// Template order is kept. A leaf missing from the document counts as a gap.
    pub fn find_gaps(
        &self,
        document: &OutputDocument,
        template: &Template,
    ) -> Result<Vec<Pointer>, JanitorError> {
        Ok(self
            .considered_fields(template)?
            .into_iter()
            .filter(|pointer| {
                document
                    .resolve_field(pointer)
                    .ok()
                    .and_then(|field| field.slots())
                    .map(|slots| slots.extracted.is_blank())
                    .unwrap_or(true)
            })
            .collect())
    }

    /// Write one note listing `gaps` into the gap leaf
    ///
    /// Returns `false` when there is nothing to write or the gap leaf cannot
    /// be written.
    pub fn write_gap_note(
        &self,
        document: &mut OutputDocument,
        template: &Template,
        gaps: &[Pointer],
    ) -> Result<bool, JanitorError> {
        if gaps.is_empty() {
            return Ok(false);
        }
        let pointer = self.config.gap_pointer()?;
        let Some((rule, slots)) = writable_slots(document, template, &pointer, "gap note") else {
            return Ok(false);
        };

        Ok(slots.apply_value(&rule, &gap_note(gaps), AppendPolicy::DedupeExact))
    }

    /// Merge source ids into the sources leaf by set membership
    ///
    /// Existing entries keep their position; new ones are appended in the order
    /// given. Returns the number of sources added.
    pub fn record_sources(
        &self,
        document: &mut OutputDocument,
        template: &Template,
        sources: &[String],
    ) -> usize {
        let Ok(pointer) = self.config.sources_pointer() else {
            tracing::warn!(pointer = %self.config.sources_pointer, "Malformed sources pointer");
            return 0;
        };
        let Some((_, slots)) = writable_slots(document, template, &pointer, "sources") else {
            return 0;
        };

        let mut recorded: Vec<String> = slots
            .extracted
            .values()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut added = 0;
        for source in sources {
            if !recorded.contains(source) {
                recorded.push(source.clone());
                added += 1;
            }
        }
        slots.extracted = Extracted::List(recorded);
        added
    }

    /// Write an RFC 3339 UTC timestamp into the timestamp leaf
    pub fn record_timestamp(
        &self,
        document: &mut OutputDocument,
        template: &Template,
        at: DateTime<Utc>,
    ) -> bool {
        let Ok(pointer) = self.config.timestamp_pointer() else {
            tracing::warn!(pointer = %self.config.timestamp_pointer, "Malformed timestamp pointer");
            return false;
        };
        let Some((_, slots)) = writable_slots(document, template, &pointer, "timestamp") else {
            return false;
        };

        slots.extracted = Extracted::Scalar(at.to_rfc3339_opts(SecondsFormat::Secs, true));
        true
    }
}

/// Resolve a writable leaf, warning when it is missing, a section or locked
fn writable_slots<'d>(
    document: &'d mut OutputDocument,
    template: &Template,
    pointer: &Pointer,
    purpose: &str,
) -> Option<(UpdateRule, &'d mut FieldSlots)> {
    let rule = match template.resolve_field(pointer) {
        Ok(field) if field.update_rule().is_locked() => {
            tracing::warn!(%pointer, purpose, "Target leaf is locked, skipping");
            return None;
        }
        Ok(field) => field.update_rule().clone(),
        Err(e) => {
            tracing::warn!(%pointer, purpose, error = %e, "Target leaf unavailable, skipping");
            return None;
        }
    };

    match document.resolve_field_mut(pointer) {
        Ok(field) => match field.slots_mut() {
            Some(slots) => Some((rule, slots)),
            None => {
                tracing::warn!(%pointer, purpose, "Target leaf has no slots, skipping");
                None
            }
        },
        Err(e) => {
            tracing::warn!(%pointer, purpose, error = %e, "Target leaf missing from document");
            None
        }
    }
}
