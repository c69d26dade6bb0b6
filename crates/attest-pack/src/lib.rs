//! # attest-pack -- Signed Archive Packager
//!
//! Bundles a document and its serialized attestation credential into a
//! single zip whose filename carries the document digest:
//!
//! ```text
//! report-digest=<hex>.zip
//! ├── report.pdf
//! └── report.pdf.cesr
//! ```
//!
//! The verifier recovers the expected digest from the filename alone, so the
//! name is part of the contract (see [`attest_core::build_archive_filename`]).
//!
//! ## Determinism
//!
//! Entries are always written in the same order with deflate compression and
//! a fixed 1980-01-01 modification time. Packaging the same document and
//! credential twice yields byte-identical archives.

pub mod archive;
pub mod error;

pub use archive::{
    package, read_archive, ArchiveContents, SignedArchive, MAX_ENTRY_BYTES, PARTIAL_SUFFIX,
};
pub use error::PackError;
