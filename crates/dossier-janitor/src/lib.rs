//! Dossier Janitor
//!
//! Post-merge sweep over the output document.
//!
//! # Overview
//!
//! After every chunk has been merged the Janitor:
//! - **Records metadata**: the reviewed sources (deduplicated, order kept) and
//!   a completion timestamp
//! - **Analyzes gaps**: every non-locked leaf that is still empty
//! - **Writes a gap note**: one synthetic entry listing the missing pointers,
//!   written into the open-questions leaf under that leaf's own update rule
//!
//! # Usage
//!
//! ```
//! use dossier_domain::{build_skeleton, Template};
//! use dossier_janitor::{Janitor, JanitorConfig};
//!
//! let template = Template::from_json_str(r#"{
//!     "overview": {"update_rule": "overwrite", "instruction": "Overview"},
//!     "gaps": {"update_rule": "append", "instruction": "Open questions"}
//! }"#).unwrap();
//! let mut document = build_skeleton(&template);
//!
//! let janitor = Janitor::new(JanitorConfig {
//!     gap_pointer: "/gaps".to_string(),
//!     ..JanitorConfig::default()
//! });
//! let report = janitor.sweep(&mut document, &template, &["a.pdf".to_string()]).unwrap();
//!
//! assert_eq!(report.gaps.len(), 1);
//! assert!(report.gap_note_written);
//! println!("{}", report.summary());
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! gap_pointer = "/14_open_questions_and_gaps"
//! sources_pointer = "/document_metadata/sources_reviewed"
//! timestamp_pointer = "/document_metadata/last_updated"
//! record_timestamp = true
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod report;

pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::{gap_note, Janitor, GAP_NOTE_PREFIX};
pub use report::SweepReport;
