//! Extraction slots and per-rule value semantics
//!
//! The same semantics are used by the merge engine for accepted candidates
//! and by the gap analyzer when it writes its synthetic note.

use crate::{EvidenceRecord, UpdateRule};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Current value of a leaf's `extracted` attribute
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Extracted {
    /// Nothing extracted yet (`null`)
    #[default]
    Empty,
    /// Single value (overwrite fields)
    Scalar(String),
    /// Ordered values (append fields)
    List(Vec<String>),
}

impl Extracted {
    /// Read an `extracted` attribute from a stored document
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Extracted::Empty,
            Value::String(s) => Extracted::Scalar(s.clone()),
            Value::Array(items) => Extracted::List(items.iter().map(value_to_text).collect()),
            other => Extracted::Scalar(other.to_string()),
        }
    }

    /// Whether this counts as a gap: null, empty string or empty list
    pub fn is_blank(&self) -> bool {
        match self {
            Extracted::Empty => true,
            Extracted::Scalar(s) => s.is_empty(),
            Extracted::List(items) => items.is_empty(),
        }
    }

    /// Values in order, regardless of shape
    pub fn values(&self) -> Vec<&str> {
        match self {
            Extracted::Empty => Vec::new(),
            Extracted::Scalar(s) => vec![s.as_str()],
            Extracted::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// Convert to list form
    ///
    /// A scalar becomes a one-element list (an empty scalar becomes an empty
    /// list), so values from earlier runs are never lost.
    fn into_list(self) -> Vec<String> {
        match self {
            Extracted::Empty => Vec::new(),
            Extracted::Scalar(s) if s.is_empty() => Vec::new(),
            Extracted::Scalar(s) => vec![s],
            Extracted::List(items) => items,
        }
    }
}

impl Serialize for Extracted {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Extracted::Empty => serializer.serialize_none(),
            Extracted::Scalar(s) => serializer.serialize_str(s),
            Extracted::List(items) => items.serialize(serializer),
        }
    }
}

/// Duplicate handling for append fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppendPolicy {
    /// Keep every appended value
    KeepAll,
    /// Skip a value whose trimmed text already appears in the list
    #[default]
    DedupeExact,
}

/// Mutable attributes added to every non-locked leaf by the skeleton builder
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSlots {
    /// Current value
    pub extracted: Extracted,

    /// Append-only provenance log
    pub evidence: Vec<EvidenceRecord>,
}

impl FieldSlots {
    /// Apply a value according to the field's update rule
    ///
    /// Returns `true` if the value was merged. The value is trimmed first;
    /// blank values and writes to locked fields are refused.
    pub fn apply_value(&mut self, rule: &UpdateRule, value: &str, policy: AppendPolicy) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        match rule {
            UpdateRule::Locked => false,
            UpdateRule::Overwrite => {
                self.extracted = Extracted::Scalar(value.to_string());
                true
            }
            UpdateRule::Append | UpdateRule::Unrecognized(_) => {
                let mut items = std::mem::take(&mut self.extracted).into_list();
                let duplicate =
                    policy == AppendPolicy::DedupeExact && items.iter().any(|v| v == value);
                if !duplicate {
                    items.push(value.to_string());
                }
                self.extracted = Extracted::List(items);
                !duplicate
            }
        }
    }

    /// Append an evidence record unless an identical one is already present
    pub fn record_evidence(&mut self, record: EvidenceRecord) -> bool {
        if self.evidence.contains(&record) {
            return false;
        }
        self.evidence.push(record);
        true
    }
}

/// Render a JSON value as plain text (strings unquoted)
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_last_writer_wins() {
        let mut slots = FieldSlots::default();
        assert!(slots.apply_value(&UpdateRule::Overwrite, " A ", AppendPolicy::KeepAll));
        assert!(slots.apply_value(&UpdateRule::Overwrite, "B", AppendPolicy::KeepAll));
        assert_eq!(slots.extracted, Extracted::Scalar("B".to_string()));
    }

    #[test]
    fn test_append_builds_list() {
        let mut slots = FieldSlots::default();
        assert!(slots.apply_value(&UpdateRule::Append, "one", AppendPolicy::KeepAll));
        assert!(slots.apply_value(&UpdateRule::Append, "two", AppendPolicy::KeepAll));
        assert_eq!(
            slots.extracted,
            Extracted::List(vec!["one".to_string(), "two".to_string()])
        );
    }

    #[test]
    fn test_append_dedupe_policy() {
        let mut keep = FieldSlots::default();
        keep.apply_value(&UpdateRule::Append, "same", AppendPolicy::KeepAll);
        assert!(keep.apply_value(&UpdateRule::Append, "same ", AppendPolicy::KeepAll));
        assert_eq!(keep.extracted.values().len(), 2);

        let mut dedupe = FieldSlots::default();
        dedupe.apply_value(&UpdateRule::Append, "same", AppendPolicy::DedupeExact);
        assert!(!dedupe.apply_value(&UpdateRule::Append, " same", AppendPolicy::DedupeExact));
        assert_eq!(dedupe.extracted.values(), vec!["same"]);
    }

    #[test]
    fn test_unrecognized_rule_appends() {
        let mut slots = FieldSlots::default();
        let rule = UpdateRule::Unrecognized("merge".to_string());
        slots.apply_value(&rule, "x", AppendPolicy::KeepAll);
        assert_eq!(slots.extracted, Extracted::List(vec!["x".to_string()]));
    }

    #[test]
    fn test_locked_and_blank_refused() {
        let mut slots = FieldSlots::default();
        assert!(!slots.apply_value(&UpdateRule::Locked, "x", AppendPolicy::KeepAll));
        assert!(!slots.apply_value(&UpdateRule::Append, "   ", AppendPolicy::KeepAll));
        assert_eq!(slots.extracted, Extracted::Empty);
    }

    #[test]
    fn test_append_promotes_existing_scalar() {
        let mut slots = FieldSlots {
            extracted: Extracted::Scalar("earlier".to_string()),
            evidence: Vec::new(),
        };
        slots.apply_value(&UpdateRule::Append, "later", AppendPolicy::KeepAll);
        assert_eq!(slots.extracted.values(), vec!["earlier", "later"]);
    }

    #[test]
    fn test_duplicate_append_onto_scalar_keeps_list_form() {
        let mut slots = FieldSlots {
            extracted: Extracted::Scalar("earlier".to_string()),
            evidence: Vec::new(),
        };
        assert!(!slots.apply_value(&UpdateRule::Append, "earlier", AppendPolicy::DedupeExact));
        assert_eq!(slots.extracted, Extracted::List(vec!["earlier".to_string()]));

        let mut blank = FieldSlots {
            extracted: Extracted::Scalar(String::new()),
            evidence: Vec::new(),
        };
        assert!(blank.apply_value(&UpdateRule::Append, "first", AppendPolicy::DedupeExact));
        assert_eq!(blank.extracted, Extracted::List(vec!["first".to_string()]));
    }

    #[test]
    fn test_blank_detection() {
        assert!(Extracted::Empty.is_blank());
        assert!(Extracted::Scalar(String::new()).is_blank());
        assert!(Extracted::List(vec![]).is_blank());
        assert!(!Extracted::List(vec!["x".to_string()]).is_blank());
    }

    #[test]
    fn test_record_evidence_skips_identical() {
        let mut slots = FieldSlots::default();
        let record = EvidenceRecord::new("a.txt", "document", "quote");
        assert!(slots.record_evidence(record.clone()));
        assert!(!slots.record_evidence(record));
        assert_eq!(slots.evidence.len(), 1);
    }

    #[test]
    fn test_from_value_shapes() {
        assert_eq!(Extracted::from_value(&Value::Null), Extracted::Empty);
        assert_eq!(
            Extracted::from_value(&serde_json::json!(["a", 2])),
            Extracted::List(vec!["a".to_string(), "2".to_string()])
        );
        assert_eq!(
            Extracted::from_value(&serde_json::json!(5)),
            Extracted::Scalar("5".to_string())
        );
    }
}
