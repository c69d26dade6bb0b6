//! # attest-core -- Foundational Types for Document Attestation
//!
//! Defines the data model shared by every other crate in the workspace:
//! the uploaded [`Document`], its [`ContentDigest`], the signed-archive
//! naming contract that binds the two together, and the identifier
//! newtypes used to address credentials and schemas.
//!
//! ## Key Design Principles
//!
//! 1. **One digest algorithm.** SHA-256, rendered as 64 lowercase hex
//!    characters. The same string goes into the credential request and the
//!    archive filename, so the two can never disagree by construction.
//!
//! 2. **Documents are immutable.** A `Document` is created once from the
//!    selected file and replaced wholesale on re-selection.
//!
//! 3. **Newtypes for identifiers.** `Said` and `SchemaSaid` are validated at
//!    construction. No bare strings for credential or schema identifiers.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `attest-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod archive;
pub mod digest;
pub mod document;
pub mod error;
pub mod identity;
pub mod temporal;

pub use archive::{
    build_archive_filename, credential_entry_name, parse_digest_from_filename,
    ARCHIVE_EXTENSION, CREDENTIAL_EXTENSION, DIGEST_MARKER,
};
pub use digest::{digest_file, sha256_digest, sha256_reader, ContentDigest, DigestAlgorithm};
pub use document::{Document, MAX_DOCUMENT_BYTES};
pub use error::CoreError;
pub use identity::{Said, SchemaSaid};
pub use temporal::Timestamp;
