//! Dot-delimited field paths

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address of a field inside a values or metadata tree
///
/// Written as dot-separated segments (`"user.name"`). Every segment is a
/// plain mapping key; numeric segments such as `"items.0"` are keys too,
/// there is no list indexing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dot-delimited path
    ///
    /// Empty paths, empty segments (`"a..b"`, `".a"`, `"a."`) and
    /// whitespace-only segments are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::invalid_path(raw, "path is empty"));
        }
        let segments = raw
            .split('.')
            .map(|segment| Self::validate_segment(raw, segment).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }

    /// Path segments, outermost first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Single-segment path from an already-valid key (tree traversal)
    pub(crate) fn from_key(key: &str) -> Self {
        Self {
            segments: vec![key.to_string()],
        }
    }

    /// Append an already-valid key (tree traversal)
    pub(crate) fn pushed(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }

    fn validate_segment<'a>(raw: &str, segment: &'a str) -> Result<&'a str> {
        if segment.is_empty() {
            return Err(Error::invalid_path(raw, "empty segment"));
        }
        if segment.trim().is_empty() {
            return Err(Error::invalid_path(raw, "blank segment"));
        }
        if segment.contains('.') {
            return Err(Error::invalid_path(raw, "segment contains '.'"));
        }
        Ok(segment)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}
