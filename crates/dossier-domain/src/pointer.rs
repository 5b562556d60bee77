//! Field pointers
//!
//! A pointer is the ordered sequence of node names from the template root to
//! a leaf, written `/section/field`. Pointers are defined once by the template
//! and never change during a run.

use crate::TemplateError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Root-to-leaf address of a template field
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    /// Parse a pointer string
    ///
    /// A well-formed pointer starts with `/`, has at least one segment and
    /// no empty segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use dossier_domain::Pointer;
    ///
    /// let p = Pointer::parse("/2_company_overview/2_1_company_description").unwrap();
    /// assert_eq!(p.segments().len(), 2);
    /// assert!(Pointer::parse("2_company_overview").is_err());
    /// assert!(Pointer::parse("/a//b").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| TemplateError::MalformedPointer(raw.to_string()))?;

        let segments: Vec<String> = rest.split('/').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(TemplateError::MalformedPointer(raw.to_string()));
        }

        Ok(Self { segments })
    }

    /// Build a pointer from already-validated segments
    pub(crate) fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Path segments from root to leaf
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Name of the top-level section this pointer lives under
    pub fn top_level(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or_default()
    }

    /// Name of the addressed node
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Pointer {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Pointer::parse(&raw).map_err(serde::de::Error::custom)
    }
}
