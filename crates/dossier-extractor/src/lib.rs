//! Dossier Extractor
//!
//! Turns a directory of source documents into an evidence-backed output
//! document shaped by a template.
//!
//! # Architecture
//!
//! ```text
//! Files → Reader → normalize → plan (chunks × catalog) → Collaborator
//!       → Gatekeeper merge (in task order) → Janitor sweep → OutputDocument
//! ```
//!
//! # Key Features
//!
//! - **Readers**: plain text, PDF pages, spreadsheet sheets and slide decks
//!   (features `pdf`, `xlsx`, `pptx`), one unit per page, sheet or slide
//! - **Granularity**: one call per document, per section or per bounded chunk
//! - **Two-stage parsing**: recovers JSON from fenced or chatty responses,
//!   then validates it item by item
//! - **Deterministic merges**: calls run concurrently, merges never reorder
//!
//! # Example Usage
//!
//! ```
//! use dossier_domain::Template;
//! use dossier_extractor::{Compiler, ExtractorConfig, LlmCollaborator, SourceUnit};
//! use dossier_llm::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let template = Template::from_json_str(r#"{
//!     "overview": {"name": {"update_rule": "overwrite", "instruction": "Company name"}}
//! }"#)?;
//!
//! let llm = MockProvider::new(r#"{"extractions": [{
//!     "pointer": "/overview/name",
//!     "value": "Acme Oy",
//!     "evidence": [{"quote": "Acme Oy was founded in 2019"}]
//! }]}"#);
//!
//! let compiler = Compiler::new(LlmCollaborator::new(llm), ExtractorConfig::default());
//! let units = vec![SourceUnit::new("about.txt", "document", "Acme Oy was founded in 2019.")];
//!
//! let result = compiler.compile(&template, &units).await?;
//! assert_eq!(result.report.values_merged, 1);
//! assert!(result.report.sweep.gaps.is_empty());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod chunking;
pub mod collaborator;
pub mod compiler;
pub mod config;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod plan;
pub mod prompt;
pub mod reader;
pub mod types;


pub use chunking::TextChunker;
pub use collaborator::LlmCollaborator;
pub use compiler::Compiler;
pub use config::{ExtractorConfig, Granularity};
pub use error::ExtractorError;
pub use normalize::normalize_text;
pub use parser::parse_extractions;
pub use plan::{plan_tasks, ExtractionTask};
pub use reader::{DocumentReader, SkippedSource, SourceFormat, SourceSet, SourceUnit};
pub use types::{CompileReport, CompileResult, SourceStats};
