//! # Document
//!
//! The user-supplied file being attested. A `Document` is an immutable
//! name + byte blob; selecting another file produces a new `Document`
//! rather than mutating the old one.

use std::path::Path;
use std::sync::Arc;

use crate::digest::{sha256_digest, ContentDigest};
use crate::error::CoreError;

/// Maximum accepted document size (15 MiB).
pub const MAX_DOCUMENT_BYTES: u64 = 15 * 1024 * 1024;

/// An uploaded document.
///
/// Cloning is cheap: the payload is shared behind an `Arc`.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    bytes: Arc<[u8]>,
}

impl Document {
    /// Create a document from a bare file name and its contents.
    ///
    /// # Errors
    ///
    /// - [`CoreError::EmptyDocumentName`] if `name` is empty or blank.
    /// - [`CoreError::InvalidDocumentName`] if `name` contains a path separator
    ///   or is `.`/`..` (the name becomes an archive entry verbatim).
    /// - [`CoreError::DocumentTooLarge`] above [`MAX_DOCUMENT_BYTES`].
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::EmptyDocumentName);
        }
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(CoreError::InvalidDocumentName { name });
        }

        let bytes = bytes.into();
        let size = bytes.len() as u64;
        if size > MAX_DOCUMENT_BYTES {
            return Err(CoreError::DocumentTooLarge {
                size,
                limit: MAX_DOCUMENT_BYTES,
            });
        }

        Ok(Self {
            name,
            bytes: Arc::from(bytes),
        })
    }

    /// Read a document from disk, naming it after the file's final path component.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(CoreError::EmptyDocumentName)?
            .to_string();

        let size = std::fs::metadata(path)?.len();
        if size > MAX_DOCUMENT_BYTES {
            return Err(CoreError::DocumentTooLarge {
                size,
                limit: MAX_DOCUMENT_BYTES,
            });
        }

        Self::new(name, std::fs::read(path)?)
    }

    /// The file name as selected, including its extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The name without its final extension: `report.v2.pdf` -> `report.v2`.
    ///
    /// Names without an extension, or whose only dot is the leading one
    /// (`.env`), are returned whole so the archive base is never empty.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) if idx > 0 => &self.name[..idx],
            _ => &self.name,
        }
    }

    /// Compute the content digest of this document.
    pub fn digest(&self) -> ContentDigest {
        sha256_digest(&self.bytes)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
