//! Dossier Gatekeeper
//!
//! Validates untrusted candidate extractions and merges the survivors into
//! the output document.
//!
//! The Gatekeeper provides:
//! - Pointer validation against the template
//! - Locked-field protection
//! - Verbatim evidence checking against the chunk text
//! - Per-rule value semantics (overwrite, append)
//!
//! # Examples
//!
//! ```
//! use dossier_domain::{build_skeleton, CandidateExtraction, Template, TextChunk};
//! use dossier_gatekeeper::{Gatekeeper, ValidationConfig};
//!
//! let template = Template::from_json_str(
//!     r#"{"financials": {"revenue": {"update_rule": "overwrite", "instruction": "Revenue"}}}"#,
//! ).unwrap();
//! let mut document = build_skeleton(&template);
//! let chunk = TextChunk::new("a.txt", "document", "Revenue was $5M in 2023.");
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//! let candidates = vec![CandidateExtraction::new("/financials/revenue", "$5M", "Revenue was $5M")];
//! let outcome = gatekeeper.merge(&mut document, &template, &chunk, &candidates);
//! assert_eq!(outcome.accepted, 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::GatekeeperError;
pub use validator::{Gatekeeper, MergeOutcome, Rejection, RejectionReason};
