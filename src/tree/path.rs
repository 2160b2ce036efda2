//! Namespace path parsing and canonicalization.
//!
//! Every path entering the core is turned into a [`KeyPath`]: an absolute,
//! `/`-separated string with no empty, `.` or `..` segments. Relative input
//! (`a/b`) is anchored at the root (`/a/b`) so both spellings address the same
//! store key.

use crate::error::NamespaceError;
use crate::types::{ROOT_PATH, SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical absolute namespace path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyPath(String);

impl KeyPath {
    /// Parse and canonicalize a caller-supplied path.
    pub fn parse(input: &str) -> Result<Self, NamespaceError> {
        if input.is_empty() {
            return Err(NamespaceError::invalid_path(input, "path is empty"));
        }
        let trimmed = input.strip_prefix(SEPARATOR).unwrap_or(input);
        let trimmed = trimmed.strip_suffix(SEPARATOR).unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut canonical = String::with_capacity(trimmed.len() + 1);
        for segment in trimmed.split(SEPARATOR) {
            validate_segment(input, segment)?;
            canonical.push(SEPARATOR);
            canonical.push_str(segment);
        }
        Ok(KeyPath(canonical))
    }

    /// Wrap a string already known to be canonical.
    pub(crate) fn from_canonical(canonical: String) -> Self {
        debug_assert!(canonical.starts_with(SEPARATOR));
        KeyPath(canonical)
    }

    pub(crate) fn is_valid_segment(segment: &str) -> bool {
        validate_segment(segment, segment).is_ok()
    }

    pub fn root() -> Self {
        KeyPath(ROOT_PATH.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_PATH
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment; empty for the root.
    pub fn name(&self) -> &str {
        match self.0.rfind(SEPARATOR) {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    pub fn parent(&self) -> Option<KeyPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(KeyPath(self.0[..idx].to_string())),
            None => None,
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Strict ancestors ordered root first; the path itself is excluded.
    pub fn ancestors(&self) -> Vec<KeyPath> {
        let mut out = Vec::with_capacity(self.depth());
        if self.is_root() {
            return out;
        }
        out.push(Self::root());
        let mut current = String::new();
        let segments: Vec<&str> = self.segments().collect();
        for segment in &segments[..segments.len() - 1] {
            current.push(SEPARATOR);
            current.push_str(segment);
            out.push(KeyPath(current.clone()));
        }
        out
    }

    /// Append one segment.
    pub fn join(&self, segment: &str) -> Result<KeyPath, NamespaceError> {
        validate_segment(segment, segment)?;
        Ok(self.child(segment))
    }

    /// Child path for a segment already validated by the caller.
    pub(crate) fn child(&self, segment: &str) -> KeyPath {
        if self.is_root() {
            KeyPath(format!("{}{}", SEPARATOR, segment))
        } else {
            KeyPath(format!("{}{}{}", self.0, SEPARATOR, segment))
        }
    }

    /// Scan prefix matching exactly the strict descendants of this path.
    pub fn child_prefix(&self) -> String {
        if self.is_root() {
            self.0.clone()
        } else {
            format!("{}{}", self.0, SEPARATOR)
        }
    }

    /// Segments of `descendant` below this path, or None if it is not a
    /// strict descendant.
    pub fn relative_segments<'a>(&self, descendant: &'a str) -> Option<Vec<&'a str>> {
        let rest = descendant.strip_prefix(self.child_prefix().as_str())?;
        if rest.is_empty() {
            return None;
        }
        Some(rest.split(SEPARATOR).collect())
    }
}

fn validate_segment(input: &str, segment: &str) -> Result<(), NamespaceError> {
    if segment.is_empty() {
        return Err(NamespaceError::invalid_path(input, "empty path segment"));
    }
    if segment == "." || segment == ".." {
        return Err(NamespaceError::invalid_path(
            input,
            format!("relative segment {:?} is not allowed", segment),
        ));
    }
    if segment.contains(SEPARATOR) {
        return Err(NamespaceError::invalid_path(input, "segment contains a separator"));
    }
    if segment.contains('\0') {
        return Err(NamespaceError::invalid_path(input, "segment contains NUL"));
    }
    Ok(())
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KeyPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for KeyPath {
    type Error = NamespaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        KeyPath::parse(&value)
    }
}

impl From<KeyPath> for String {
    fn from(path: KeyPath) -> Self {
        path.0
    }
}

impl std::str::FromStr for KeyPath {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyPath::parse(s)
    }
}
