//! Unified error types for swid-tools.
//!
//! The taxonomy follows the four failure classes of the library: input
//! errors (reported immediately at the point of use), validation errors
//! (collected across the whole document and reported together at build
//! time), consistency errors (distinct named conditions callers can branch
//! on), and codec errors (per offending field, all-or-nothing writes).

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for swid-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SwidError {
    /// IO errors with path context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A path string that cannot be normalized
    #[error("Malformed resource path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    /// A zero-length resource rejected by the caller's policy
    #[error("Empty resource '{path}' rejected by policy")]
    EmptyResource { path: String },

    /// Aggregate digest requested while an entry lacks its SHA-512 digest
    #[error("Resource '{path}' lacks the sha-512 digest required for aggregation")]
    MissingDigest { path: String },

    /// A terminal build invoked on an already-built document
    #[error("Tag document already built; builders freeze after the terminal build")]
    AlreadyBuilt,

    /// Cross-field validation failures, collected across the whole document
    #[error("Tag validation failed: {0}")]
    Validation(ValidationErrors),

    /// Errors during serialization or deserialization
    #[error("Codec failure: {context}")]
    Codec {
        context: String,
        #[source]
        source: CodecErrorKind,
    },
}

/// One violated constraint found at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Field (or section) the constraint applies to
    pub field: String,
    /// Human-readable description of the violation
    pub reason: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// The full set of constraints violated by one `build()` invocation.
///
/// Build-time validation is collect-all, not fail-on-first, so a caller
/// sees every problem in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationIssue>);

impl ValidationErrors {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self(issues)
    }

    /// All violated constraints, in the order they were checked
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any issue names the given field
    pub fn mentions_field(&self, field: &str) -> bool {
        self.0.iter().any(|i| i.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} constraint(s) violated [", self.0.len())?;
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        write!(f, "]")
    }
}

/// Specific codec error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CodecErrorKind {
    #[error("CBOR encoding error: {0}")]
    CborEncode(String),

    #[error("CBOR decoding error: {0}")]
    CborDecode(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Document feature not expressible in this format: {field} - {message}")]
    UnsupportedFeature { field: String, message: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid field value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unknown hash algorithm identifier: {0}")]
    UnknownAlgorithm(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for swid-tools operations
pub type Result<T> = std::result::Result<T, SwidError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SwidError {
    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a malformed-path error
    pub fn malformed_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a validation error from collected issues
    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        Self::Validation(ValidationErrors::new(issues))
    }

    /// Create a codec error with context
    pub fn codec(context: impl Into<String>, source: CodecErrorKind) -> Self {
        Self::Codec {
            context: context.into(),
            source,
        }
    }

    /// Create a codec error for a feature the target format cannot express
    pub fn unsupported_feature(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::codec(
            "unsupported document feature",
            CodecErrorKind::UnsupportedFeature {
                field: field.into(),
                message: message.into(),
            },
        )
    }

    /// Create a codec error for a missing required field in decoded input
    pub fn codec_missing_field(context: impl Into<String>, field: impl Into<String>) -> Self {
        Self::codec(context, CodecErrorKind::MissingField(field.into()))
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SwidError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}
