//! Dossier Domain Layer
//!
//! Core model for template-driven report compilation. Everything here is pure
//! data and logic: no I/O beyond reading a template file, no LLM calls, no
//! async. Infrastructure crates depend on this one, never the reverse.
//!
//! ## Key Concepts
//!
//! - **Template**: an ordered tree of sections and leaf fields
//! - **Pointer**: root-to-leaf path uniquely addressing a field
//! - **Update rule**: per-field merge policy (`locked`, `overwrite`, `append`)
//! - **Field Catalog**: the non-locked leaves, the only thing a collaborator sees
//! - **Output Document**: the template plus `extracted`/`evidence` slots on
//!   every non-locked leaf
//! - **Evidence**: a verbatim quote tying a merged value to its source chunk
//!
//! ## Example
//!
//! ```
//! use dossier_domain::{Template, OutputDocument, Pointer};
//!
//! let template = Template::from_json_str(r#"{
//!     "overview": {
//!         "name": {"update_rule": "overwrite", "instruction": "Company name"},
//!         "version": {"update_rule": "locked", "instruction": "Template version"}
//!     }
//! }"#).unwrap();
//!
//! let leaves = template.identify_leaves();
//! assert_eq!(leaves.len(), 2);
//! assert_eq!(template.catalog().len(), 1);
//!
//! let output = OutputDocument::from_template(&template);
//! let name = output.resolve_field(&Pointer::parse("/overview/name").unwrap()).unwrap();
//! assert!(name.slots().is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod catalog;
pub mod chunk;
pub mod document;
pub mod error;
pub mod evidence;
pub mod pointer;
pub mod template;
pub mod traits;
pub mod value;

// Re-exports for convenience
pub use candidate::{CandidateExtraction, ClaimedEvidence};
pub use catalog::{CatalogEntry, FieldCatalog};
pub use chunk::TextChunk;
pub use document::{build_skeleton, OutputDocument};
pub use error::TemplateError;
pub use evidence::EvidenceRecord;
pub use pointer::Pointer;
pub use template::{Field, Node, Section, Template, UpdateRule};
pub use value::{AppendPolicy, Extracted, FieldSlots};
