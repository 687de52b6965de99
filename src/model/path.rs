//! Normalized resource path identity.
//!
//! Resources are keyed by a derived, normalized path form rather than the
//! raw input string: separators are canonicalized to `/`, `.` segments are
//! dropped, `..` segments fold into their parent, and case is preserved.
//! Equality, ordering, and hashing are all defined over the normalized
//! form only, so two paths are equal iff their normalized strings are.

use crate::error::{Result, SwidError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A normalized, platform-independent resource path.
///
/// Immutable once constructed. The raw input string is retained so callers
/// holding the original spelling can still resolve it through a
/// collection's secondary index.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct ResourcePath {
    /// The normalized path string (the identity)
    normalized: String,
    /// The raw input string as supplied by the producer
    raw: String,
}

impl ResourcePath {
    /// Normalize a raw path string into a `ResourcePath`.
    ///
    /// Fails with [`SwidError::MalformedPath`] when the input is empty,
    /// normalizes to nothing, or escapes its root via leading `..`.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let normalized = Self::normalize(&raw)?;
        Ok(Self { normalized, raw })
    }

    fn normalize(raw: &str) -> Result<String> {
        if raw.trim().is_empty() {
            return Err(SwidError::malformed_path(raw, "path is empty"));
        }

        let unified = raw.replace('\\', "/");
        let mut segments: Vec<&str> = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(SwidError::malformed_path(
                            raw,
                            "'..' segment escapes the resource root",
                        ));
                    }
                }
                other => segments.push(other),
            }
        }

        if segments.is_empty() {
            return Err(SwidError::malformed_path(raw, "path has no segments"));
        }
        Ok(segments.join("/"))
    }

    /// The normalized path string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// The raw input string this path was constructed from
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Final path segment (the file name)
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.normalized
            .rsplit('/')
            .next()
            .unwrap_or(&self.normalized)
    }
}

impl PartialEq for ResourcePath {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl PartialOrd for ResourcePath {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResourcePath {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

impl Hash for ResourcePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalized)
    }
}
