//! Field catalog exposed to the extraction collaborator
//!
//! Derived once from the template and immutable for the run. Locked fields
//! are never listed, so they cannot even be proposed for update.

use crate::{Pointer, UpdateRule};
use serde::Serialize;

/// One non-locked leaf: what to extract and how it merges
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Field address
    pub pointer: Pointer,

    /// Merge policy
    pub update_rule: UpdateRule,

    /// What to extract
    pub instruction: String,
}

/// Ordered list of catalog entries
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    entries: Vec<CatalogEntry>,
}

impl FieldCatalog {
    /// Entries in template order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a pointer is listed
    pub fn contains(&self, pointer: &Pointer) -> bool {
        self.entries.iter().any(|e| &e.pointer == pointer)
    }

    /// Top-level section names that own at least one entry, in order
    pub fn sections(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entry in &self.entries {
            let top = entry.pointer.top_level();
            if !names.iter().any(|n| n == top) {
                names.push(top.to_string());
            }
        }
        names
    }

    /// Entries under one top-level section
    pub fn for_section(&self, section: &str) -> FieldCatalog {
        self.entries
            .iter()
            .filter(|e| e.pointer.top_level() == section)
            .cloned()
            .collect()
    }
}

impl FromIterator<CatalogEntry> for FieldCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
