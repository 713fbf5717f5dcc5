//! Error types for transform lowering and graph document output.
//!
//! Only contract violations are errors here. Transforms that have no
//! lowering rule are reported as [`Diagnostic`](crate::Diagnostic)s
//! alongside a successful result.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for MaterialX generation.
pub type MtlxResult<T> = Result<T, MtlxError>;

/// Errors that can occur while lowering or writing graph documents.
#[derive(Debug, Error)]
pub enum MtlxError {
    /// I/O error reading a transform library or writing a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Transform library file not found.
    #[error("transform library not found: {path}")]
    LibraryNotFound {
        /// Path that was searched.
        path: PathBuf,
    },

    /// A transform is missing parameters its lowering rule requires.
    #[error("malformed transform at position {position}: {reason}")]
    MalformedTransform {
        /// Index of the offending transform in the input sequence.
        position: usize,
        /// Description of what's wrong.
        reason: String,
    },

    /// A transform entry in a library could not be interpreted.
    #[error("invalid transform entry: {reason}")]
    InvalidTransform {
        /// Description of what's wrong.
        reason: String,
    },

    /// The provider has no conversion for this pair.
    #[error("no conversion available: {source_space} -> {target_space}")]
    NoConversion {
        /// Source color space.
        source_space: String,
        /// Destination color space.
        target_space: String,
    },

    /// A node input references a node that does not precede it.
    #[error("node '{node}' references unknown node '{target}'")]
    DanglingReference {
        /// Node holding the reference.
        node: String,
        /// Referenced id.
        target: String,
    },

    /// Graph structure check failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// XML serialization error.
    #[error("XML write error: {0}")]
    Xml(String),
}

impl MtlxError {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        Self::MalformedTransform {
            position,
            reason: reason.into(),
        }
    }
}
