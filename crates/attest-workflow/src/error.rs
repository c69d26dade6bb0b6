//! Workflow error types.
//!
//! Every variant is recoverable: the caller reports it and the user retries.

use attest_gateway::GatewayError;
use attest_pack::PackError;

use crate::state::Step;

/// Errors returned by workflow steps.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// A step was attempted before `initialize` probed the signing agent.
    #[error("signing agent not initialized; call initialize first")]
    ExtensionNotInitialized,

    #[error("signing agent is not installed")]
    ExtensionNotInstalled,

    #[error("no document selected")]
    NoDocument,

    /// Credential issuance needs a successful authorization for the current document.
    #[error("authorization required before issuing a credential")]
    AuthorizationRequired,

    /// Download needs an issued credential for the current document.
    #[error("no credential issued for the current document")]
    CredentialNotIssued,

    /// Another step is awaiting the signing agent.
    #[error("{step} is already in progress")]
    StepInFlight { step: Step },

    /// The document changed while the step was awaiting the agent; its
    /// result was discarded.
    #[error("{step} result discarded: document changed while it was in progress")]
    Superseded { step: Step },

    #[error("authorization failed: {0}")]
    AuthorizationFailed(#[source] GatewayError),

    #[error("credential issuance failed: {0}")]
    CredentialIssuanceFailed(#[source] GatewayError),

    #[error("credential fetch failed: {0}")]
    CredentialFetchFailed(#[source] GatewayError),

    #[error("archive packaging failed: {0}")]
    Packaging(#[from] PackError),
}

impl WorkflowError {
    /// Whether the user dismissed an agent prompt.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::AuthorizationFailed(e)
            | Self::CredentialIssuanceFailed(e)
            | Self::CredentialFetchFailed(e) => e.is_cancelled(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_cause_in_message() {
        let err = WorkflowError::AuthorizationFailed(GatewayError::Cancelled {
            operation: "authorize",
        });
        assert_eq!(
            err.to_string(),
            "authorization failed: authorize was cancelled by the user"
        );
        assert!(err.is_cancelled());
    }

    #[test]
    fn in_flight_names_step() {
        let err = WorkflowError::StepInFlight {
            step: Step::IssueCredential,
        };
        assert_eq!(err.to_string(), "issue_credential is already in progress");
    }
}
