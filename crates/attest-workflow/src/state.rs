//! # Workflow State
//!
//! ```text
//!                 select_document
//!   Idle ─────────────────────────▶ DigestReady ──▶ Authorizing ──▶ Authorized
//!    ▲                                  ▲               │               │
//!    │ clear_document                   │               ▼               ▼
//!    │                                  │             Error      IssuingCredential
//!    │                                  │                               │
//!    │                                  │                               ▼
//!    │                                  │   FetchingCredential ◀──▶ CredentialIssued
//!    │                                  │
//!    └──────── any state ───────────────┘ (select_document)
//! ```
//!
//! Session data lives inside the variants, so a credential can only exist
//! alongside the document and digest it was issued for. `Error` remembers
//! the stable state it interrupted; the next step resumes from there.

use serde::{Deserialize, Serialize};

use attest_core::{ContentDigest, Document, Timestamp};
use attest_gateway::{AttestationCredential, AuthorizationGrant};

// ─── Steps ───────────────────────────────────────────────────────────

/// A workflow step that talks to the signing agent or packages output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Authorize,
    IssueCredential,
    FetchCredential,
    Package,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Authorize => "authorize",
            Self::IssueCredential => "issue_credential",
            Self::FetchCredential => "fetch_credential",
            Self::Package => "package",
        };
        f.write_str(s)
    }
}

// ─── Session Data ────────────────────────────────────────────────────

/// The selected document and the digest computed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSession {
    pub document: Document,
    pub digest: ContentDigest,
}

impl DocumentSession {
    /// Compute the digest for a freshly selected document.
    pub fn new(document: Document) -> Self {
        let digest = document.digest();
        Self { document, digest }
    }
}

/// A document session whose user has granted an identity for signing.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizedSession {
    pub session: DocumentSession,
    pub grant: AuthorizationGrant,
}

/// A document session holding the credential issued over its digest.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedSession {
    pub session: DocumentSession,
    pub credential: AttestationCredential,
}

/// A failed step and where to resume from.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    pub step: Step,
    /// User-facing description of the failure.
    pub message: String,
    /// The stable state the failed step started from (or fell back to).
    pub resume: Box<WorkflowState>,
}

// ─── State ───────────────────────────────────────────────────────────

/// Observable state of an attestation workflow.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    /// No document selected.
    #[default]
    Idle,
    DigestReady(DocumentSession),
    Authorizing(DocumentSession),
    Authorized(AuthorizedSession),
    IssuingCredential(AuthorizedSession),
    CredentialIssued(IssuedSession),
    /// Download in progress: fetching the serialized credential and packaging.
    FetchingCredential(IssuedSession),
    Error(StepFailure),
}

impl WorkflowState {
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Idle => StateKind::Idle,
            Self::DigestReady(_) => StateKind::DigestReady,
            Self::Authorizing(_) => StateKind::Authorizing,
            Self::Authorized(_) => StateKind::Authorized,
            Self::IssuingCredential(_) => StateKind::IssuingCredential,
            Self::CredentialIssued(_) => StateKind::CredentialIssued,
            Self::FetchingCredential(_) => StateKind::FetchingCredential,
            Self::Error(_) => StateKind::Error,
        }
    }

    /// The step currently awaiting the agent, if any.
    pub fn pending_step(&self) -> Option<Step> {
        match self {
            Self::Authorizing(_) => Some(Step::Authorize),
            Self::IssuingCredential(_) => Some(Step::IssueCredential),
            Self::FetchingCredential(_) => Some(Step::FetchCredential),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending_step().is_some()
    }

    /// The state a new step starts from: the state itself, or for `Error`
    /// the state the failure interrupted.
    pub fn stable(&self) -> &WorkflowState {
        match self {
            Self::Error(failure) => failure.resume.stable(),
            other => other,
        }
    }

    /// The current document session, if a document is selected.
    pub fn session(&self) -> Option<&DocumentSession> {
        match self {
            Self::Idle => None,
            Self::DigestReady(s) | Self::Authorizing(s) => Some(s),
            Self::Authorized(a) | Self::IssuingCredential(a) => Some(&a.session),
            Self::CredentialIssued(i) | Self::FetchingCredential(i) => Some(&i.session),
            Self::Error(f) => f.resume.session(),
        }
    }

    pub fn digest(&self) -> Option<&ContentDigest> {
        self.session().map(|s| &s.digest)
    }

    /// The issued credential, if one is held for the current document.
    pub fn credential(&self) -> Option<&AttestationCredential> {
        match self.stable() {
            Self::CredentialIssued(i) | Self::FetchingCredential(i) => Some(&i.credential),
            _ => None,
        }
    }

    /// The last failure, if the workflow is in `Error`.
    pub fn failure(&self) -> Option<&StepFailure> {
        match self {
            Self::Error(f) => Some(f),
            _ => None,
        }
    }
}

/// Discriminant of [`WorkflowState`] for logging and transition records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateKind {
    Idle,
    DigestReady,
    Authorizing,
    Authorized,
    IssuingCredential,
    CredentialIssued,
    FetchingCredential,
    Error,
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::DigestReady => "DIGEST_READY",
            Self::Authorizing => "AUTHORIZING",
            Self::Authorized => "AUTHORIZED",
            Self::IssuingCredential => "ISSUING_CREDENTIAL",
            Self::CredentialIssued => "CREDENTIAL_ISSUED",
            Self::FetchingCredential => "FETCHING_CREDENTIAL",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Record of a workflow state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from_state: StateKind,
    pub to_state: StateKind,
    pub timestamp: Timestamp,
    pub reason: String,
}
