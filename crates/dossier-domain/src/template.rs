//! Template model
//!
//! A template is an ordered tree. A node is a leaf field iff it is an object
//! carrying both `update_rule` and `instruction`; any other object is a
//! section. This structural test is the only leaf criterion.

use crate::value::value_to_text;
use crate::{CatalogEntry, EvidenceRecord, Extracted, FieldCatalog, FieldSlots, Pointer, TemplateError};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

const UPDATE_RULE_KEY: &str = "update_rule";
const INSTRUCTION_KEY: &str = "instruction";
const EXTRACTED_KEY: &str = "extracted";
const EVIDENCE_KEY: &str = "evidence";

/// Per-field merge policy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpdateRule {
    /// Never written by extraction
    Locked,
    /// Last writer (in chunk order) wins
    Overwrite,
    /// Values accumulate in an ordered list
    Append,
    /// Any other rule; behaves as `Append`
    Unrecognized(String),
}

impl UpdateRule {
    /// Parse a rule from its template value (case-insensitive)
    pub fn parse(raw: &Value) -> Self {
        let text = value_to_text(raw).trim().to_lowercase();
        match text.as_str() {
            "locked" => UpdateRule::Locked,
            "overwrite" => UpdateRule::Overwrite,
            "append" => UpdateRule::Append,
            _ => UpdateRule::Unrecognized(text),
        }
    }

    /// Whether the field is locked
    pub fn is_locked(&self) -> bool {
        matches!(self, UpdateRule::Locked)
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &str {
        match self {
            UpdateRule::Locked => "locked",
            UpdateRule::Overwrite => "overwrite",
            UpdateRule::Append => "append",
            UpdateRule::Unrecognized(other) => other,
        }
    }
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UpdateRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A node in a template or output tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Structural container
    Section(Section),
    /// Addressable leaf field
    Field(Field),
    /// Non-object value carried through verbatim (never a leaf)
    Literal(Value),
}

/// Ordered mapping of child names to nodes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    children: IndexMap<String, Node>,
}

/// A leaf field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    update_rule: UpdateRule,
    instruction: String,
    /// Every template key except `extracted`/`evidence`, in declared order
    attributes: Map<String, Value>,
    /// Present only on non-locked fields of an output document (or a
    /// template that already carries prior extraction state)
    slots: Option<FieldSlots>,
}

impl Node {
    fn from_value(value: &Value, path: &[String]) -> Result<Node, TemplateError> {
        match value {
            Value::Object(map) if map.contains_key(UPDATE_RULE_KEY) && map.contains_key(INSTRUCTION_KEY) => {
                Ok(Node::Field(Field::from_object(map)))
            }
            Value::Object(map) => Ok(Node::Section(Section::from_object(map, path)?)),
            other => Ok(Node::Literal(other.clone())),
        }
    }
}

impl Section {
    fn from_object(map: &Map<String, Value>, path: &[String]) -> Result<Section, TemplateError> {
        let mut children = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            if key.is_empty() || key.contains('/') {
                return Err(TemplateError::InvalidKey {
                    key: key.clone(),
                    parent: display_path(path),
                });
            }
            let mut child_path = path.to_vec();
            child_path.push(key.clone());
            children.insert(key.clone(), Node::from_value(value, &child_path)?);
        }
        Ok(Section { children })
    }

    /// Children in declared order
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up a direct child
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Resolve a pointer to any node
    pub fn resolve(&self, pointer: &Pointer) -> Result<&Node, TemplateError> {
        let (last, parents) = split_pointer(pointer)?;
        let mut current = self;
        for segment in parents {
            current = match current.children.get(segment.as_str()) {
                Some(Node::Section(section)) => section,
                Some(Node::Literal(_)) => return Err(TemplateError::NotAnObject(pointer.to_string())),
                Some(Node::Field(_)) | None => {
                    return Err(TemplateError::PointerNotFound(pointer.to_string()))
                }
            };
        }
        current
            .children
            .get(last.as_str())
            .ok_or_else(|| TemplateError::PointerNotFound(pointer.to_string()))
    }

    /// Resolve a pointer that must address a leaf field
    pub fn resolve_field(&self, pointer: &Pointer) -> Result<&Field, TemplateError> {
        match self.resolve(pointer)? {
            Node::Field(field) => Ok(field),
            Node::Section(_) => Err(TemplateError::NotALeaf(pointer.to_string())),
            Node::Literal(_) => Err(TemplateError::NotAnObject(pointer.to_string())),
        }
    }

    /// Resolve a pointer to a mutable leaf field
    pub fn resolve_field_mut(&mut self, pointer: &Pointer) -> Result<&mut Field, TemplateError> {
        let (last, parents) = split_pointer(pointer)?;
        let mut current = self;
        for segment in parents {
            current = match current.children.get_mut(segment.as_str()) {
                Some(Node::Section(section)) => section,
                Some(Node::Literal(_)) => return Err(TemplateError::NotAnObject(pointer.to_string())),
                Some(Node::Field(_)) | None => {
                    return Err(TemplateError::PointerNotFound(pointer.to_string()))
                }
            };
        }
        match current.children.get_mut(last.as_str()) {
            Some(Node::Field(field)) => Ok(field),
            Some(Node::Section(_)) => Err(TemplateError::NotALeaf(pointer.to_string())),
            Some(Node::Literal(_)) => Err(TemplateError::NotAnObject(pointer.to_string())),
            None => Err(TemplateError::PointerNotFound(pointer.to_string())),
        }
    }

    /// Leaf fields in depth-first declared order
    pub fn fields(&self) -> Vec<(Pointer, &Field)> {
        let mut out = Vec::new();
        self.collect_fields(&mut Vec::new(), &mut out);
        out
    }

    fn collect_fields<'a>(&'a self, path: &mut Vec<String>, out: &mut Vec<(Pointer, &'a Field)>) {
        for (name, node) in &self.children {
            path.push(name.clone());
            match node {
                Node::Field(field) => out.push((Pointer::from_segments(path.clone()), field)),
                Node::Section(section) => section.collect_fields(path, out),
                Node::Literal(_) => {}
            }
            path.pop();
        }
    }

    /// Visit every leaf field mutably, depth-first in declared order
    pub(crate) fn for_each_field_mut(&mut self, visit: &mut dyn FnMut(&mut Field)) {
        for node in self.children.values_mut() {
            match node {
                Node::Field(field) => visit(field),
                Node::Section(section) => section.for_each_field_mut(visit),
                Node::Literal(_) => {}
            }
        }
    }
}

impl Field {
    fn from_object(map: &Map<String, Value>) -> Field {
        let update_rule = map
            .get(UPDATE_RULE_KEY)
            .map(UpdateRule::parse)
            .unwrap_or(UpdateRule::Unrecognized(String::new()));
        let instruction = map.get(INSTRUCTION_KEY).map(value_to_text).unwrap_or_default();

        let carries_state = map.contains_key(EXTRACTED_KEY) || map.contains_key(EVIDENCE_KEY);
        let slots = if carries_state && !update_rule.is_locked() {
            Some(FieldSlots {
                extracted: map.get(EXTRACTED_KEY).map(Extracted::from_value).unwrap_or_default(),
                evidence: map.get(EVIDENCE_KEY).map(parse_evidence).unwrap_or_default(),
            })
        } else {
            None
        };

        // Locked fields keep any extracted/evidence keys as plain attributes
        let attributes = map
            .iter()
            .filter(|(key, _)| slots.is_none() || (key.as_str() != EXTRACTED_KEY && key.as_str() != EVIDENCE_KEY))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Field {
            update_rule,
            instruction,
            attributes,
            slots,
        }
    }

    /// Merge policy of this field
    pub fn update_rule(&self) -> &UpdateRule {
        &self.update_rule
    }

    /// Natural-language description of what to extract
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Additional template attributes (e.g. a display title)
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Extraction slots, `None` on locked fields and bare template fields
    pub fn slots(&self) -> Option<&FieldSlots> {
        self.slots.as_ref()
    }

    /// Mutable extraction slots
    pub fn slots_mut(&mut self) -> Option<&mut FieldSlots> {
        self.slots.as_mut()
    }

    /// Add default slots unless the field is locked or already has them
    pub(crate) fn ensure_slots(&mut self) {
        if !self.update_rule.is_locked() && self.slots.is_none() {
            self.slots = Some(FieldSlots::default());
        }
    }
}

/// Read-only template, loaded once per run
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    root: Section,
}

impl Template {
    /// Build a template from a parsed JSON value
    ///
    /// The root must be an object; it is always treated as a section.
    pub fn from_value(value: &Value) -> Result<Self, TemplateError> {
        let map = value
            .as_object()
            .ok_or_else(|| TemplateError::NotAnObject("/".to_string()))?;
        Ok(Self {
            root: Section::from_object(map, &[])?,
        })
    }

    /// Parse a template from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, TemplateError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Load a template file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Root section
    pub fn root(&self) -> &Section {
        &self.root
    }

    /// Every leaf pointer, depth-first in declared order
    ///
    /// Deterministic: the same template always yields the same list.
    pub fn identify_leaves(&self) -> Vec<Pointer> {
        self.root.fields().into_iter().map(|(pointer, _)| pointer).collect()
    }

    /// Resolve a pointer to any node
    pub fn resolve(&self, pointer: &Pointer) -> Result<&Node, TemplateError> {
        self.root.resolve(pointer)
    }

    /// Resolve a pointer that must address a leaf field
    pub fn resolve_field(&self, pointer: &Pointer) -> Result<&Field, TemplateError> {
        self.root.resolve_field(pointer)
    }

    /// Field catalog: every non-locked leaf
    pub fn catalog(&self) -> FieldCatalog {
        self.root
            .fields()
            .into_iter()
            .filter(|(_, field)| !field.update_rule.is_locked())
            .map(|(pointer, field)| CatalogEntry {
                pointer,
                update_rule: field.update_rule.clone(),
                instruction: field.instruction.clone(),
            })
            .collect()
    }

    /// Catalog restricted to one top-level section
    pub fn catalog_for_section(&self, section: &str) -> FieldCatalog {
        self.catalog().for_section(section)
    }

    /// Serialize back to a JSON value
    pub fn to_value(&self) -> Value {
        section_to_value(&self.root)
    }

    pub(crate) fn root_clone(&self) -> Section {
        self.root.clone()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Section(section) => section.serialize(serializer),
            Node::Field(field) => field.serialize(serializer),
            Node::Literal(value) => value.serialize(serializer),
        }
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.children.len()))?;
        for (name, node) in &self.children {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = if self.slots.is_some() { 2 } else { 0 };
        let mut map = serializer.serialize_map(Some(self.attributes.len() + extra))?;
        for (key, value) in &self.attributes {
            map.serialize_entry(key, value)?;
        }
        if let Some(slots) = &self.slots {
            map.serialize_entry(EXTRACTED_KEY, &slots.extracted)?;
            map.serialize_entry(EVIDENCE_KEY, &slots.evidence)?;
        }
        map.end()
    }
}

pub(crate) fn section_to_value(section: &Section) -> Value {
    // Serializing into a Value cannot fail: all keys are strings
    serde_json::to_value(section).unwrap_or(Value::Null)
}

fn parse_evidence(value: &Value) -> Vec<EvidenceRecord> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn split_pointer(pointer: &Pointer) -> Result<(&String, &[String]), TemplateError> {
    pointer
        .segments()
        .split_last()
        .ok_or_else(|| TemplateError::MalformedPointer(pointer.to_string()))
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        Pointer::from_segments(path.to_vec()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Template {
        Template::from_value(&json!({
            "document_metadata": {
                "title": {"update_rule": "locked", "instruction": "Static title", "value": "DD Report"},
                "sources_reviewed": {"update_rule": "append", "instruction": "Files reviewed"}
            },
            "2_company_overview": {
                "2_1_company_description": {"update_rule": "overwrite", "instruction": "Describe the company"},
                "2_2_history": {
                    "founding": {"update_rule": "Append", "instruction": "Founding story"}
                }
            },
            "version": "1.0"
        }))
        .unwrap()
    }

    #[test]
    fn test_identify_leaves_in_declared_order() {
        let pointers: Vec<String> = sample().identify_leaves().iter().map(|p| p.to_string()).collect();
        assert_eq!(
            pointers,
            vec![
                "/document_metadata/title",
                "/document_metadata/sources_reviewed",
                "/2_company_overview/2_1_company_description",
                "/2_company_overview/2_2_history/founding",
            ]
        );
    }

    #[test]
    fn test_leaf_requires_both_keys() {
        let template = Template::from_value(&json!({
            "a": {"update_rule": "append"},
            "b": {"instruction": "only instruction"},
            "c": {"update_rule": "append", "instruction": "leaf"}
        }))
        .unwrap();
        let leaves = template.identify_leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].to_string(), "/c");
        // "a" is a section whose child is a literal
        assert!(matches!(
            template.resolve(&Pointer::parse("/a/update_rule").unwrap()),
            Ok(Node::Literal(_))
        ));
    }

    #[test]
    fn test_update_rule_parsing() {
        assert_eq!(UpdateRule::parse(&json!("LOCKED")), UpdateRule::Locked);
        assert_eq!(UpdateRule::parse(&json!(" overwrite ")), UpdateRule::Overwrite);
        assert_eq!(UpdateRule::parse(&json!("append")), UpdateRule::Append);
        assert_eq!(
            UpdateRule::parse(&json!("merge")),
            UpdateRule::Unrecognized("merge".to_string())
        );
        assert!(matches!(UpdateRule::parse(&json!(null)), UpdateRule::Unrecognized(_)));
    }

    #[test]
    fn test_resolve_errors() {
        let template = sample();
        let missing = Pointer::parse("/2_company_overview/nope").unwrap();
        assert!(matches!(template.resolve(&missing), Err(TemplateError::PointerNotFound(_))));

        let section = Pointer::parse("/2_company_overview").unwrap();
        assert!(matches!(template.resolve_field(&section), Err(TemplateError::NotALeaf(_))));

        let literal = Pointer::parse("/version").unwrap();
        assert!(matches!(template.resolve_field(&literal), Err(TemplateError::NotAnObject(_))));

        let through_literal = Pointer::parse("/version/x").unwrap();
        assert!(matches!(template.resolve(&through_literal), Err(TemplateError::NotAnObject(_))));

        let through_leaf = Pointer::parse("/document_metadata/title/value").unwrap();
        assert!(matches!(template.resolve(&through_leaf), Err(TemplateError::PointerNotFound(_))));
    }

    #[test]
    fn test_catalog_excludes_locked() {
        let catalog = sample().catalog();
        let pointers: Vec<String> = catalog.entries().iter().map(|e| e.pointer.to_string()).collect();
        assert_eq!(
            pointers,
            vec![
                "/document_metadata/sources_reviewed",
                "/2_company_overview/2_1_company_description",
                "/2_company_overview/2_2_history/founding",
            ]
        );
        assert_eq!(catalog.entries()[2].update_rule, UpdateRule::Append);
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let err = Template::from_value(&json!({"a": {"b/c": {"update_rule": "append", "instruction": "x"}}}))
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::InvalidKey {
                key: "b/c".to_string(),
                parent: "/a".to_string()
            }
        );
        assert!(Template::from_value(&json!({"": {}})).is_err());
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(matches!(
            Template::from_value(&json!(["not", "an", "object"])),
            Err(TemplateError::NotAnObject(_))
        ));
        assert!(matches!(Template::from_json_str("{oops"), Err(TemplateError::Json(_))));
    }

    #[test]
    fn test_round_trip_preserves_order_and_attributes() {
        let template = sample();
        let text = serde_json::to_string(&template.to_value()).unwrap();
        assert!(text.starts_with(r#"{"document_metadata":{"title":{"update_rule":"locked","instruction":"Static title","value":"DD Report"}"#));
        assert!(text.contains(r#""update_rule":"Append""#), "original spelling kept");
        assert!(text.ends_with(r#""version":"1.0"}"#));
    }

    #[test]
    fn test_prior_state_is_parsed_into_slots() {
        let template = Template::from_value(&json!({
            "x": {
                "update_rule": "append",
                "instruction": "extract X",
                "extracted": ["earlier"],
                "evidence": [{"source_id": "a.txt", "location": "document", "quote": "earlier"}]
            },
            "y": {"update_rule": "locked", "instruction": "fixed", "extracted": "static"}
        }))
        .unwrap();

        let x = template.resolve_field(&Pointer::parse("/x").unwrap()).unwrap();
        let slots = x.slots().unwrap();
        assert_eq!(slots.extracted.values(), vec!["earlier"]);
        assert_eq!(slots.evidence.len(), 1);

        let y = template.resolve_field(&Pointer::parse("/y").unwrap()).unwrap();
        assert!(y.slots().is_none());
        assert_eq!(y.attribute("extracted"), Some(&json!("static")));
    }
}
