//! Catalog command implementation.

use crate::cli::CatalogArgs;
use crate::error::Result;
use crate::output::Formatter;
use dossier_domain::Template;

/// Execute the catalog command.
pub fn execute_catalog(args: CatalogArgs, formatter: &Formatter) -> Result<()> {
    let template = Template::from_path(&args.template)?;
    let catalog = template.catalog();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    } else {
        println!("{}", formatter.catalog(&catalog));
    }
    Ok(())
}
