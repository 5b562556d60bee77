//! Gaps command implementation.

use crate::cli::GapsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use dossier_domain::{OutputDocument, Pointer, Template};
use dossier_janitor::Janitor;

/// Execute the gaps command.
pub fn execute_gaps(args: GapsArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let template = Template::from_path(&args.template)?;
    let document = OutputDocument::from_path(&args.document)?;

    let (gaps, total) = find_gaps(&document, &template, &Janitor::new(config.janitor.clone()))?;
    println!("{}", formatter.gaps(&gaps, total));
    Ok(())
}

/// Empty fields of `document` and the number of fields considered.
pub fn find_gaps(
    document: &OutputDocument,
    template: &Template,
    janitor: &Janitor,
) -> Result<(Vec<Pointer>, usize)> {
    let total = janitor.considered_fields(template)?.len();
    let gaps = janitor.find_gaps(document, template)?;
    Ok((gaps, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_gaps_in_saved_document() {
        let template = Template::from_value(&json!({
            "a": {"update_rule": "append", "instruction": "x"},
            "b": {"update_rule": "overwrite", "instruction": "y"},
            "c": {"update_rule": "locked", "instruction": "z"}
        }))
        .unwrap();
        let saved = json!({
            "a": {"update_rule": "append", "instruction": "x", "extracted": ["filled"], "evidence": []},
            "b": {"update_rule": "overwrite", "instruction": "y", "extracted": "", "evidence": []},
            "c": {"update_rule": "locked", "instruction": "z"}
        });
        let document = OutputDocument::from_value(&saved).unwrap();

        let (gaps, total) = find_gaps(&document, &template, &Janitor::default_config()).unwrap();
        assert_eq!(gaps, vec![Pointer::parse("/b").unwrap()]);
        assert_eq!(total, 2);
    }
}
