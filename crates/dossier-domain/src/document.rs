//! Output document (skeleton and merged state)
//!
//! The output tree mirrors the template. Every non-locked leaf carries
//! `extracted` and `evidence`; locked leaves carry neither, so a merge that
//! reaches one has nowhere to write.

use crate::template::section_to_value;
use crate::{Field, Node, Pointer, Section, Template, TemplateError};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::path::Path;

/// Mutable output tree for one run
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDocument {
    root: Section,
}

/// Build the output skeleton for a template
///
/// Deep, independent copy of the template with default slots added to every
/// non-locked leaf. Slots already present in the template are kept.
pub fn build_skeleton(template: &Template) -> OutputDocument {
    OutputDocument::from_template(template)
}

impl OutputDocument {
    /// Build the output skeleton for a template
    pub fn from_template(template: &Template) -> Self {
        let mut root = template.root_clone();
        root.for_each_field_mut(&mut |field: &mut Field| field.ensure_slots());
        Self { root }
    }

    /// Load a previously written output document
    pub fn from_value(value: &Value) -> Result<Self, TemplateError> {
        Ok(Self::from_template(&Template::from_value(value)?))
    }

    /// Parse a previously written output document
    pub fn from_json_str(text: &str) -> Result<Self, TemplateError> {
        Ok(Self::from_template(&Template::from_json_str(text)?))
    }

    /// Load a previously written output document from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        Ok(Self::from_template(&Template::from_path(path)?))
    }

    /// Root section
    pub fn root(&self) -> &Section {
        &self.root
    }

    /// Resolve a pointer to any node
    pub fn resolve(&self, pointer: &Pointer) -> Result<&Node, TemplateError> {
        self.root.resolve(pointer)
    }

    /// Resolve a pointer that must address a leaf field
    pub fn resolve_field(&self, pointer: &Pointer) -> Result<&Field, TemplateError> {
        self.root.resolve_field(pointer)
    }

    /// Resolve a pointer to a mutable leaf field
    pub fn resolve_field_mut(&mut self, pointer: &Pointer) -> Result<&mut Field, TemplateError> {
        self.root.resolve_field_mut(pointer)
    }

    /// Leaf fields in depth-first declared order
    pub fn fields(&self) -> Vec<(Pointer, &Field)> {
        self.root.fields()
    }

    /// Serialize to a JSON value
    pub fn to_value(&self) -> Value {
        section_to_value(&self.root)
    }

    /// Serialize to pretty-printed JSON text
    pub fn to_json_pretty(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }
}

impl Serialize for OutputDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}
