//! Dossier CLI - compile evidence-backed report documents from source files.

use clap::Parser;
use dossier_cli::commands;
use dossier_cli::{Cli, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    dossier_cli::init_tracing(cli.verbose);

    let formatter = Formatter::new(!cli.no_color);
    if let Err(e) = run(cli, &formatter).await {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, formatter: &Formatter) -> dossier_cli::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Compile(args) => commands::execute_compile(args, config, formatter).await,
        Command::Catalog(args) => commands::execute_catalog(args, formatter),
        Command::Gaps(args) => commands::execute_gaps(args, &config, formatter),
    }
}
