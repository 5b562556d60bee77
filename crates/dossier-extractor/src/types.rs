//! Result types for a compile run

use crate::config::Granularity;
use crate::reader::SkippedSource;
use dossier_domain::OutputDocument;
use dossier_gatekeeper::{MergeOutcome, RejectionReason};
use dossier_janitor::SweepReport;
use std::collections::BTreeMap;

/// Per-source counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// Collaborator calls made for this source
    pub tasks: usize,

    /// Calls that failed or timed out
    pub failed: usize,

    /// Values merged from this source
    pub values_merged: usize,
}

/// Counters for one compile run
#[derive(Debug, Clone)]
pub struct CompileReport {
    /// Granularity the run used
    pub granularity: Granularity,

    /// Collaborator calls planned
    pub tasks: usize,

    /// Calls that failed or timed out and contributed nothing
    pub chunks_failed: usize,

    /// Candidates returned by the collaborator
    pub candidates_proposed: usize,

    /// Candidates merged into the document
    pub values_merged: usize,

    /// Evidence records written
    pub evidence_recorded: usize,

    /// Claimed quotes that did not verify
    pub evidence_dropped: usize,

    /// Rejected candidates, by reason
    pub rejections_by_reason: BTreeMap<RejectionReason, usize>,

    /// Counters keyed by source id
    pub per_source: BTreeMap<String, SourceStats>,

    /// Files the reader could not use
    pub skipped_sources: Vec<SkippedSource>,

    /// Post-merge sweep
    pub sweep: SweepReport,
}

impl CompileReport {
    /// Total rejected candidates
    pub fn rejected(&self) -> usize {
        self.rejections_by_reason.values().sum()
    }

    pub(crate) fn record_merge(&mut self, source_id: &str, outcome: &MergeOutcome) {
        self.values_merged += outcome.accepted;
        self.evidence_recorded += outcome.evidence_recorded;
        self.evidence_dropped += outcome.evidence_dropped;
        for rejection in &outcome.rejections {
            *self.rejections_by_reason.entry(rejection.reason).or_default() += 1;
        }
        self.per_source.entry(source_id.to_string()).or_default().values_merged +=
            outcome.accepted;
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Compile Summary".to_string(),
            "===============".to_string(),
            format!("Granularity: {}", self.granularity),
            format!(
                "Calls: {} ({} failed)",
                self.tasks, self.chunks_failed
            ),
            format!("Candidates proposed: {}", self.candidates_proposed),
            format!("Values merged: {}", self.values_merged),
            format!(
                "Evidence: {} recorded, {} dropped",
                self.evidence_recorded, self.evidence_dropped
            ),
        ];

        if !self.rejections_by_reason.is_empty() {
            lines.push(format!("Rejected: {}", self.rejected()));
            for (reason, count) in &self.rejections_by_reason {
                lines.push(format!("  {}: {}", reason, count));
            }
        }

        if !self.per_source.is_empty() {
            lines.push(String::new());
            lines.push("Sources:".to_string());
            for (source, stats) in &self.per_source {
                lines.push(format!(
                    "  {}: {} calls, {} failed, {} merged",
                    source, stats.tasks, stats.failed, stats.values_merged
                ));
            }
        }

        if !self.skipped_sources.is_empty() {
            lines.push(String::new());
            lines.push(format!("Skipped files ({}):", self.skipped_sources.len()));
            for skipped in &self.skipped_sources {
                lines.push(format!("  {}: {}", skipped.name, skipped.reason));
            }
        }

        lines.push(String::new());
        lines.push(self.sweep.summary());
        lines.join("\n")
    }
}

/// Compiled document plus run counters
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// The output document
    pub document: OutputDocument,

    /// What happened along the way
    pub report: CompileReport,
}
