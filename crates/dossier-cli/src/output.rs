//! Output formatting for the CLI.

use colored::*;
use dossier_domain::{FieldCatalog, Pointer};
use dossier_extractor::CompileReport;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format the end-of-run summary.
    pub fn compile_summary(&self, report: &CompileReport) -> String {
        let mut lines = vec![report.summary()];

        let coverage = format!(
            "Coverage: {}/{} fields ({:.0}%)",
            report.sweep.filled_fields,
            report.sweep.total_fields,
            report.sweep.coverage() * 100.0
        );
        lines.push(String::new());
        lines.push(if report.sweep.gaps.is_empty() {
            self.success(&coverage)
        } else {
            self.warning(&coverage)
        });

        if report.chunks_failed > 0 {
            lines.push(self.warning(&format!(
                "{} extraction call(s) failed; their chunks contributed nothing",
                report.chunks_failed
            )));
        }

        lines.join("\n")
    }

    /// Format a field catalog as one line per field.
    pub fn catalog(&self, catalog: &FieldCatalog) -> String {
        if catalog.is_empty() {
            return self.colorize("No extractable fields.", "yellow");
        }

        catalog
            .entries()
            .iter()
            .map(|entry| {
                format!(
                    "{} [{}] {}",
                    self.colorize(&entry.pointer.to_string(), "cyan"),
                    entry.update_rule,
                    entry.instruction
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a gap list.
    pub fn gaps(&self, gaps: &[Pointer], total: usize) -> String {
        if gaps.is_empty() {
            return self.success(&format!("No gaps ({} fields filled)", total));
        }

        let mut lines = vec![self.warning(&format!(
            "{} of {} field(s) have no evidenced value:",
            gaps.len(),
            total
        ))];
        lines.extend(gaps.iter().map(|gap| format!("  {}", gap)));
        lines.join("\n")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::Template;
    use serde_json::json;

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("bad"), "✗ bad");
    }

    #[test]
    fn test_catalog_lines() {
        let catalog = Template::from_value(&json!({
            "a": {
                "one": {"update_rule": "append", "instruction": "First"},
                "two": {"update_rule": "locked", "instruction": "Never"}
            }
        }))
        .unwrap()
        .catalog();

        let output = Formatter::new(false).catalog(&catalog);
        assert_eq!(output, "/a/one [append] First");
    }

    #[test]
    fn test_empty_catalog() {
        let output = Formatter::new(false).catalog(&FieldCatalog::default());
        assert!(output.contains("No extractable fields"));
    }

    #[test]
    fn test_gaps() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.gaps(&[], 3), "✓ No gaps (3 fields filled)");

        let gaps = vec![Pointer::parse("/a/one").unwrap()];
        let output = formatter.gaps(&gaps, 3);
        assert!(output.starts_with("⚠ 1 of 3 field(s)"));
        assert!(output.ends_with("  /a/one"));
    }
}
