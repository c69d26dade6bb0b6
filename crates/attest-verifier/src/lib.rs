//! # attest-verifier -- Verification Submitter
//!
//! Posts a signed archive to a remote verification service and frames the
//! answer as pass or fail.
//!
//! ## Trust Boundary
//!
//! The client recovers the expected digest from the archive filename
//! (`*-digest=<value>.zip`) and nothing else. It does not open the archive,
//! re-hash the document, or check that the credential inside claims the same
//! digest. Those decisions belong to the service.
//!
//! ## Failure Policy
//!
//! - Malformed filename: fails before any request.
//! - Non-2xx status: [`VerificationError::Rejected`], never retried.
//! - Transport failure: retried with exponential backoff up to
//!   `max_retries`, then [`VerificationError::Transport`].

pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub(crate) mod retry;

pub use client::{VerificationClient, VerificationOutcome, UPLOAD_FIELD};
pub use config::{ConfigError, VerifierConfig};
pub use error::VerificationError;
pub use report::VerificationReport;
