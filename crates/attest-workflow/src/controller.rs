//! # Attestation Workflow Controller
//!
//! Drives one signing session against an injected [`ExtensionGateway`]:
//! select a document, authorize, issue a credential over its digest, then
//! download the signed archive.
//!
//! ## Concurrency
//!
//! Methods take `&self`; state sits behind a mutex that is released before
//! every gateway call. Two guards keep results consistent:
//!
//! - **Pending guard.** While a step awaits the agent, any other step fails
//!   with [`WorkflowError::StepInFlight`] without touching the gateway.
//! - **Stale-result guard.** Each document selection bumps a generation
//!   counter. A step that completes under a different generation is
//!   discarded with [`WorkflowError::Superseded`] and leaves state alone.

use std::sync::Arc;

use parking_lot::Mutex;

use attest_core::{ContentDigest, Document, Timestamp};
use attest_gateway::{
    AttestationCredential, AuthorizationGrant, AuthorizeRequest, CreateCredentialRequest,
    ExtensionGateway, GatewayError,
};
use attest_pack::SignedArchive;

use crate::config::SigningConfig;
use crate::error::WorkflowError;
use crate::state::{
    AuthorizedSession, DocumentSession, IssuedSession, Step, StepFailure, TransitionRecord,
    WorkflowState,
};

/// Result of probing the signing agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtensionStatus {
    /// `initialize` has not completed yet.
    #[default]
    Unknown,
    Installed,
    NotInstalled,
}

#[derive(Debug, Default)]
struct Inner {
    state: WorkflowState,
    extension: ExtensionStatus,
    generation: u64,
    transitions: Vec<TransitionRecord>,
}

impl Inner {
    /// Fail unless a new step may start.
    fn require_ready(&self) -> Result<(), WorkflowError> {
        if let Some(step) = self.state.pending_step() {
            return Err(WorkflowError::StepInFlight { step });
        }
        match self.extension {
            ExtensionStatus::Unknown => Err(WorkflowError::ExtensionNotInitialized),
            ExtensionStatus::NotInstalled => Err(WorkflowError::ExtensionNotInstalled),
            ExtensionStatus::Installed => Ok(()),
        }
    }

    fn require_generation(&self, generation: u64, step: Step) -> Result<(), WorkflowError> {
        if self.generation != generation {
            tracing::debug!(%step, "discarding result for a replaced document");
            return Err(WorkflowError::Superseded { step });
        }
        Ok(())
    }

    /// Record a state transition.
    fn transition(&mut self, to: WorkflowState, reason: &str) {
        let from_state = self.state.kind();
        let to_state = to.kind();
        self.transitions.push(TransitionRecord {
            from_state,
            to_state,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        tracing::info!(from = %from_state, to = %to_state, reason, "workflow transition");
        self.state = to;
    }

    fn fail(&mut self, step: Step, error: &WorkflowError, resume: WorkflowState) {
        tracing::warn!(%step, error = %error, "workflow step failed");
        let reason = format!("{step} failed");
        self.transition(
            WorkflowState::Error(StepFailure {
                step,
                message: error.to_string(),
                resume: Box::new(resume),
            }),
            &reason,
        );
    }
}

/// Orchestrates authorize, issue and download for the selected document.
pub struct AttestationWorkflow {
    gateway: Arc<dyn ExtensionGateway>,
    config: SigningConfig,
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for AttestationWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttestationWorkflow")
            .field("gateway", &self.gateway.gateway_name())
            .field("config", &self.config)
            .field("state", &self.inner.lock().state.kind())
            .finish()
    }
}

impl AttestationWorkflow {
    pub fn new(gateway: Arc<dyn ExtensionGateway>, config: SigningConfig) -> Self {
        Self {
            gateway,
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> WorkflowState {
        self.inner.lock().state.clone()
    }

    /// Every transition so far, oldest first.
    pub fn transitions(&self) -> Vec<TransitionRecord> {
        self.inner.lock().transitions.clone()
    }

    pub fn extension_status(&self) -> ExtensionStatus {
        self.inner.lock().extension
    }

    pub fn is_pending(&self) -> bool {
        self.inner.lock().state.is_pending()
    }

    // ── Setup ────────────────────────────────────────────────────────

    /// Probe the signing agent and apply the configured vendor theme.
    ///
    /// A theme the agent refuses is logged and ignored. May be called again
    /// to re-probe.
    pub async fn initialize(&self) -> Result<(), WorkflowError> {
        let installed = self.gateway.detect_installed().await;
        if installed {
            if let Some(theme_url) = &self.config.theme_url {
                if let Err(e) = self.gateway.configure_vendor(theme_url).await {
                    tracing::warn!(theme_url = %theme_url, error = %e, "vendor theme not applied");
                }
            }
        }

        let status = if installed {
            ExtensionStatus::Installed
        } else {
            ExtensionStatus::NotInstalled
        };
        self.inner.lock().extension = status;
        tracing::info!(gateway = self.gateway.gateway_name(), installed, "signing agent probed");

        if installed {
            Ok(())
        } else {
            Err(WorkflowError::ExtensionNotInstalled)
        }
    }

    // ── Document selection ───────────────────────────────────────────

    /// Select a document, discarding any grant or credential held for the
    /// previous one. Allowed at any time, including while a step is pending.
    pub fn select_document(&self, document: Document) -> ContentDigest {
        let session = DocumentSession::new(document);
        let digest = session.digest.clone();
        let reason = format!("document selected: {}", session.document.name());

        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.transition(WorkflowState::DigestReady(session), &reason);
        digest
    }

    /// Drop the selected document and return to `Idle`.
    pub fn clear_document(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.transition(WorkflowState::Idle, "document cleared");
    }

    // ── Steps ────────────────────────────────────────────────────────

    /// Ask the user to select an identity for signing the current document.
    ///
    /// Re-authorizing after issuance discards the issued credential.
    pub async fn authorize(&self) -> Result<AuthorizationGrant, WorkflowError> {
        self.run_authorize().await.map(|(_, grant)| grant)
    }

    async fn run_authorize(&self) -> Result<(u64, AuthorizationGrant), WorkflowError> {
        let (generation, session) = {
            let mut inner = self.inner.lock();
            inner.require_ready()?;
            let session = inner
                .state
                .session()
                .cloned()
                .ok_or(WorkflowError::NoDocument)?;
            inner.transition(
                WorkflowState::Authorizing(session.clone()),
                "authorization requested",
            );
            (inner.generation, session)
        };

        let result = self
            .gateway
            .authorize(&AuthorizeRequest::challenge_now())
            .await;

        let mut inner = self.inner.lock();
        inner.require_generation(generation, Step::Authorize)?;
        match result {
            Ok(grant) => {
                tracing::info!(
                    identifier = grant.identifier_prefix().unwrap_or("<undisclosed>"),
                    "identity selected"
                );
                inner.transition(
                    WorkflowState::Authorized(AuthorizedSession {
                        session,
                        grant: grant.clone(),
                    }),
                    "authorization granted",
                );
                Ok((generation, grant))
            }
            Err(e) => {
                let err = WorkflowError::AuthorizationFailed(e);
                inner.fail(Step::Authorize, &err, WorkflowState::DigestReady(session));
                Err(err)
            }
        }
    }

    /// Issue a data-attestation credential over the current digest.
    ///
    /// Requires a successful [`authorize`](Self::authorize) for the current
    /// document; otherwise fails with [`WorkflowError::AuthorizationRequired`]
    /// and the agent is not called.
    pub async fn issue_credential(&self) -> Result<AttestationCredential, WorkflowError> {
        self.run_issue(None).await
    }

    /// Authorize and, if that succeeds for the same document, issue.
    pub async fn authorize_and_issue(&self) -> Result<AttestationCredential, WorkflowError> {
        let (generation, _) = self.run_authorize().await?;
        self.run_issue(Some(generation)).await
    }

    async fn run_issue(
        &self,
        expected_generation: Option<u64>,
    ) -> Result<AttestationCredential, WorkflowError> {
        let (generation, authorized) = {
            let mut inner = self.inner.lock();
            inner.require_ready()?;
            if let Some(expected) = expected_generation {
                inner.require_generation(expected, Step::IssueCredential)?;
            }
            let authorized = match inner.state.stable() {
                WorkflowState::Authorized(a) => a.clone(),
                WorkflowState::Idle => return Err(WorkflowError::NoDocument),
                _ => {
                    tracing::warn!("credential issuance attempted without authorization");
                    return Err(WorkflowError::AuthorizationRequired);
                }
            };
            inner.transition(
                WorkflowState::IssuingCredential(authorized.clone()),
                "credential issuance requested",
            );
            (inner.generation, authorized)
        };

        let request = CreateCredentialRequest::new(
            &authorized.session.digest,
            self.config.schema_said.clone(),
        );
        let result = self
            .gateway
            .create_data_attestation_credential(&request)
            .await;

        let mut inner = self.inner.lock();
        inner.require_generation(generation, Step::IssueCredential)?;
        match result {
            Ok(credential) => {
                tracing::info!(said = %credential.said, digest = %authorized.session.digest, "credential issued");
                inner.transition(
                    WorkflowState::CredentialIssued(IssuedSession {
                        session: authorized.session,
                        credential: credential.clone(),
                    }),
                    "credential issued",
                );
                Ok(credential)
            }
            Err(e) => {
                // A refusal means the agent no longer honours the grant.
                let resume = if matches!(e, GatewayError::Rejected { .. }) {
                    WorkflowState::DigestReady(authorized.session)
                } else {
                    WorkflowState::Authorized(authorized)
                };
                let err = WorkflowError::CredentialIssuanceFailed(e);
                inner.fail(Step::IssueCredential, &err, resume);
                Err(err)
            }
        }
    }

    /// Fetch the serialized credential and package it with the document.
    ///
    /// On failure the issued credential is kept so the download can be retried.
    pub async fn download_archive(&self) -> Result<SignedArchive, WorkflowError> {
        let (generation, issued) = {
            let mut inner = self.inner.lock();
            inner.require_ready()?;
            let issued = match inner.state.stable() {
                WorkflowState::CredentialIssued(i) => i.clone(),
                WorkflowState::Idle => return Err(WorkflowError::NoDocument),
                _ => return Err(WorkflowError::CredentialNotIssued),
            };
            inner.transition(
                WorkflowState::FetchingCredential(issued.clone()),
                "credential download requested",
            );
            (inner.generation, issued)
        };

        let outcome = self
            .gateway
            .get_credential(&issued.credential.said, true)
            .await
            .map_err(WorkflowError::CredentialFetchFailed)
            .and_then(|raw| {
                attest_pack::package(
                    &issued.session.document,
                    raw.as_bytes(),
                    &issued.session.digest,
                )
                .map_err(WorkflowError::from)
            });

        let mut inner = self.inner.lock();
        inner.require_generation(generation, Step::FetchCredential)?;
        match outcome {
            Ok(archive) => {
                inner.transition(WorkflowState::CredentialIssued(issued), "archive packaged");
                Ok(archive)
            }
            Err(err) => {
                let step = match err {
                    WorkflowError::Packaging(_) => Step::Package,
                    _ => Step::FetchCredential,
                };
                inner.fail(step, &err, WorkflowState::CredentialIssued(issued));
                Err(err)
            }
        }
    }
}
