//! Markdown rendering of an output document.

use dossier_domain::{Extracted, OutputDocument};

/// Document title.
pub const TITLE: &str = "Due Diligence Master Document (Draft)";

const INTRO: &str = "This draft is automatically compiled from provided source documents. \
It includes only items supported by direct quotes (see evidence bullets).";

/// Render the filled leaves of `document` as Markdown.
///
/// Each filled leaf gets a heading built from its path (`a / b`), nested at
/// most six levels deep. List values become bullets, scalar values a
/// paragraph, and evidence follows as `source (location): quote` bullets.
/// Empty and locked leaves are omitted.
pub fn render_markdown(document: &OutputDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n{}\n", TITLE, INTRO));

    for (pointer, field) in document.fields() {
        let Some(slots) = field.slots() else { continue };
        if slots.extracted.is_blank() {
            continue;
        }

        let segments = pointer.segments();
        let level = (segments.len() + 1).min(6);
        out.push_str(&format!("\n{} {}\n\n", "#".repeat(level), segments.join(" / ")));

        match &slots.extracted {
            Extracted::Scalar(value) => {
                out.push_str(value);
                out.push('\n');
            }
            Extracted::List(values) => {
                for value in values {
                    out.push_str(&format!("- {}\n", single_line(value)));
                }
            }
            Extracted::Empty => {}
        }

        if !slots.evidence.is_empty() {
            out.push_str("\nEvidence:\n\n");
            for record in &slots.evidence {
                out.push_str(&format!(
                    "- {} ({}): {}\n",
                    record.source_id,
                    record.location,
                    single_line(&record.quote)
                ));
            }
        }
    }

    out
}

/// Keep multi-line text inside one bullet
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
