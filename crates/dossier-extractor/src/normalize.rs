//! Source text normalization
//!
//! The normalized form is what chunks carry and what evidence quotes are
//! matched against, so it must be applied exactly once, before chunking.

/// Normalize whitespace and strip control characters
///
/// - non-breaking spaces become spaces
/// - runs of tabs and carriage returns become one space
/// - other control characters (except newline) are removed
/// - three or more consecutive newlines collapse to two
/// - runs of spaces collapse to one
/// - leading and trailing whitespace is trimmed
///
/// # Examples
///
/// ```
/// use dossier_extractor::normalize_text;
///
/// assert_eq!(normalize_text("Revenue\t\twas  $5M\r\n\n\n\nin 2023."), "Revenue was $5M \n\nin 2023.");
/// ```
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut newlines = 0usize;
    let mut in_tab_run = false;

    for c in raw.chars() {
        let c = if c == '\u{00a0}' { ' ' } else { c };

        if c == '\t' || c == '\r' {
            if !in_tab_run {
                push_space(&mut out);
                in_tab_run = true;
            }
            newlines = 0;
            continue;
        }
        in_tab_run = false;

        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push('\n');
            }
            continue;
        }
        if c.is_control() {
            continue;
        }
        newlines = 0;

        if c == ' ' {
            push_space(&mut out);
        } else {
            out.push(c);
        }
    }

    out.trim().to_string()
}

fn push_space(out: &mut String) {
    if !out.ends_with(' ') {
        out.push(' ');
    }
}
