//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use dossier_extractor::Granularity;
use std::path::PathBuf;

/// Dossier - Compile evidence-backed report documents from source files.
#[derive(Debug, Parser)]
#[command(name = "dossier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (default: ~/.dossier/config.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile source documents into the master document
    Compile(CompileArgs),

    /// Print the fields a template asks for
    Catalog(CatalogArgs),

    /// Report empty fields in an existing output document
    Gaps(GapsArgs),
}

/// Granularity of extraction calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GranularityArg {
    /// One call per document (or PDF page)
    Document,
    /// One call per chunk and template section
    Section,
    /// One call per chunk
    Chunk,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Document => Granularity::Document,
            GranularityArg::Section => Granularity::Section,
            GranularityArg::Chunk => Granularity::Chunk,
        }
    }
}

/// Arguments for the compile command.
#[derive(Debug, Parser)]
pub struct CompileArgs {
    /// Directory of source documents
    #[arg(long, default_value = "docs")]
    pub docs: PathBuf,

    /// Template JSON path
    #[arg(long, default_value = "master-document-template.json")]
    pub template: PathBuf,

    /// Output JSON path
    #[arg(long, default_value = "output/master_document.json")]
    pub out_json: PathBuf,

    /// Output Markdown path
    #[arg(long, default_value = "output/master_document.md")]
    pub out_md: PathBuf,

    /// Skip writing the Markdown rendering
    #[arg(long)]
    pub no_md: bool,

    /// Model identifier
    #[arg(long, env = "OPENAI_MODEL")]
    pub model: Option<String>,

    /// API base URL
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub base_url: Option<String>,

    /// Maximum characters per chunk
    #[arg(long)]
    pub max_chunk_chars: Option<usize>,

    /// Extraction call granularity
    #[arg(long, value_enum)]
    pub granularity: Option<GranularityArg>,

    /// Extraction calls in flight at once
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Arguments for the catalog command.
#[derive(Debug, Parser)]
pub struct CatalogArgs {
    /// Template JSON path
    #[arg(long, default_value = "master-document-template.json")]
    pub template: PathBuf,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the gaps command.
#[derive(Debug, Parser)]
pub struct GapsArgs {
    /// Output document to inspect
    #[arg(long, default_value = "output/master_document.json")]
    pub document: PathBuf,

    /// Template the document was compiled from
    #[arg(long, default_value = "master-document-template.json")]
    pub template: PathBuf,
}
