//! Sweep report

use chrono::{DateTime, Utc};
use dossier_domain::Pointer;

/// Outcome of one post-merge sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    /// Non-locked leaves still empty, in template order
    pub gaps: Vec<Pointer>,

    /// Whether a gap note was written
    pub gap_note_written: bool,

    /// Sources newly added to the sources leaf
    pub sources_recorded: usize,

    /// When the sweep finished
    pub completed_at: DateTime<Utc>,

    /// Non-locked leaves holding a value
    pub filled_fields: usize,

    /// Non-locked leaves considered (the gap leaf excluded)
    pub total_fields: usize,
}

impl SweepReport {
    /// Fraction of considered leaves holding a value
    pub fn coverage(&self) -> f64 {
        if self.total_fields == 0 {
            return 1.0;
        }
        self.filled_fields as f64 / self.total_fields as f64
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Sweep Summary".to_string(),
            "=============".to_string(),
            format!(
                "Fields filled: {}/{} ({:.0}%)",
                self.filled_fields,
                self.total_fields,
                self.coverage() * 100.0
            ),
            format!("Sources recorded: {}", self.sources_recorded),
            format!("Completed at: {}", self.completed_at.to_rfc3339()),
        ];

        if !self.gaps.is_empty() {
            lines.push(String::new());
            lines.push(format!("Gaps ({}):", self.gaps.len()));
            for gap in &self.gaps {
                lines.push(format!("  {}", gap));
            }
            if !self.gap_note_written {
                lines.push("  (gap note not written)".to_string());
            }
        }

        lines.join("\n")
    }
}
