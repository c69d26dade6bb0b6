//! # Error Types
//!
//! Errors raised while constructing the core data model. All errors use
//! `thiserror` and carry the offending value so the front-end can show it
//! to the user verbatim.

use thiserror::Error;

/// Error type for `attest-core`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Reading document bytes failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The document has no usable file name.
    #[error("document name must not be empty")]
    EmptyDocumentName,

    /// The document name contains path components.
    #[error("document name {name:?} must be a bare file name")]
    InvalidDocumentName {
        /// The rejected name.
        name: String,
    },

    /// The document exceeds the upload limit.
    #[error("document is {size} bytes; the maximum is {limit} bytes")]
    DocumentTooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// A digest string could not be parsed.
    #[error("invalid digest {value:?}: {reason}")]
    InvalidDigest {
        /// The rejected digest text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An archive filename does not follow the `<base>-digest=<digest>.<ext>` convention.
    #[error("malformed archive name {filename:?}: {reason}")]
    MalformedArchiveName {
        /// The filename that was parsed.
        filename: String,
        /// Which part of the convention is missing.
        reason: &'static str,
    },

    /// An identifier failed validation.
    #[error("invalid {kind}: {reason}")]
    InvalidIdentifier {
        /// Identifier kind (e.g. "SAID").
        kind: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A timestamp could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
