//! # attest-workflow -- Attestation Workflow Controller
//!
//! Replaces a scattering of pending/error/issued flags with one explicit
//! [`WorkflowState`] and a controller that is the only writer of it.
//!
//! ## Flow
//!
//! ```text
//! select_document ─▶ authorize ─▶ issue_credential ─▶ download_archive
//!   (digest)          (grant)       (credential)        (signed zip)
//! ```
//!
//! The gateway is injected as an `Arc<dyn ExtensionGateway>`, so tests and
//! demos run the full flow against
//! [`MockExtensionGateway`](attest_gateway::MockExtensionGateway).
//!
//! ## Guarantees
//!
//! - `CredentialIssued` is only reachable through a successful authorization
//!   for the current document.
//! - Issuing without authorization fails before any agent call.
//! - Selecting a new document discards the previous grant and credential,
//!   and any in-flight result for the old document is dropped.

pub mod config;
pub mod controller;
pub mod error;
pub mod state;

pub use config::{ConfigError, SigningConfig};
pub use controller::{AttestationWorkflow, ExtensionStatus};
pub use error::WorkflowError;
pub use state::{
    AuthorizedSession, DocumentSession, IssuedSession, StateKind, Step, StepFailure,
    TransitionRecord, WorkflowState,
};
