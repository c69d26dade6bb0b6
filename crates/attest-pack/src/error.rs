//! Packaging error types.

/// Errors from building, persisting, or reading signed archives.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// The zip encoder or decoder failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Reading or writing archive bytes failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive does not hold exactly a document and its `.cesr` credential.
    #[error("unexpected archive layout: {reason}")]
    UnexpectedLayout { reason: String },

    /// An entry decompresses to more than the reader accepts.
    #[error("archive entry {name:?} exceeds {limit} bytes")]
    EntryTooLarge { name: String, limit: u64 },
}
