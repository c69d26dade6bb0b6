//! Mock signing agent for testing and development.
//!
//! Behaves like the real agent where the workflow can observe it:
//! credential creation is refused until an `authorize` call has succeeded,
//! every call is recorded, and issued credentials can be fetched back by
//! SAID. Outcomes can be scripted per operation to exercise failure paths.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use url::Url;

use attest_core::{sha256_digest, Said};

use crate::error::GatewayError;
use crate::types::{
    AttestationCredential, AuthorizationGrant, AuthorizeRequest, CreateCredentialRequest,
    RawCredential,
};
use crate::ExtensionGateway;

/// Identifier prefix reported by the mock for the "selected" identity.
pub const MOCK_IDENTIFIER_PREFIX: &str = "EMockIdentifierPrefix000000000000000000000000";

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    DetectInstalled,
    ConfigureVendor(String),
    Authorize(String),
    CreateCredential { digest: String, schema_said: String },
    GetCredential { said: String, include_raw: bool },
}

/// Scripted result of a mock operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockOutcome {
    #[default]
    Succeed,
    /// The user dismisses the prompt.
    Cancel,
    /// The agent refuses the request.
    Reject,
    /// The agent answers with an HTTP-style 503.
    Unavailable,
    /// Succeeds but the response lacks the expected payload.
    Malformed,
}

#[derive(Debug, Default)]
struct MockState {
    authorize: MockOutcome,
    create: MockOutcome,
    fetch: MockOutcome,
    authorized: bool,
    issued: HashMap<Said, String>,
    calls: Vec<GatewayCall>,
}

/// Scriptable in-memory signing agent.
#[derive(Debug)]
pub struct MockExtensionGateway {
    installed: bool,
    state: Mutex<MockState>,
}

impl Default for MockExtensionGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtensionGateway {
    /// An installed agent where every operation succeeds.
    pub fn new() -> Self {
        Self {
            installed: true,
            state: Mutex::new(MockState::default()),
        }
    }

    /// An agent that reports itself as missing.
    pub fn not_installed() -> Self {
        Self {
            installed: false,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn set_authorize_outcome(&self, outcome: MockOutcome) {
        self.state.lock().authorize = outcome;
    }

    pub fn set_create_outcome(&self, outcome: MockOutcome) {
        self.state.lock().create = outcome;
    }

    pub fn set_fetch_outcome(&self, outcome: MockOutcome) {
        self.state.lock().fetch = outcome;
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().calls.clone()
    }

    /// Number of create-credential calls received.
    pub fn create_calls(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, GatewayCall::CreateCredential { .. }))
            .count()
    }

    fn fail(outcome: MockOutcome, operation: &'static str) -> Option<GatewayError> {
        match outcome {
            MockOutcome::Succeed | MockOutcome::Malformed => None,
            MockOutcome::Cancel => Some(GatewayError::Cancelled { operation }),
            MockOutcome::Reject => Some(GatewayError::Rejected {
                operation,
                reason: "scripted rejection".into(),
            }),
            MockOutcome::Unavailable => Some(GatewayError::Agent {
                operation,
                status: 503,
                body: "agent busy".into(),
            }),
        }
    }

    fn require_installed(&self) -> Result<(), GatewayError> {
        if self.installed {
            Ok(())
        } else {
            Err(GatewayError::NotInstalled)
        }
    }
}

#[async_trait]
impl ExtensionGateway for MockExtensionGateway {
    async fn detect_installed(&self) -> bool {
        self.state.lock().calls.push(GatewayCall::DetectInstalled);
        self.installed
    }

    async fn configure_vendor(&self, theme_url: &Url) -> Result<(), GatewayError> {
        self.state
            .lock()
            .calls
            .push(GatewayCall::ConfigureVendor(theme_url.to_string()));
        self.require_installed()
    }

    async fn authorize(
        &self,
        request: &AuthorizeRequest,
    ) -> Result<AuthorizationGrant, GatewayError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(GatewayCall::Authorize(request.message.clone()));
        self.require_installed()?;

        if let Some(err) = Self::fail(state.authorize, "authorize") {
            state.authorized = false;
            return Err(err);
        }
        state.authorized = true;

        if state.authorize == MockOutcome::Malformed {
            return Ok(AuthorizationGrant::from_value(json!({})));
        }
        Ok(AuthorizationGrant::from_value(json!({
            "identifier": { "prefix": MOCK_IDENTIFIER_PREFIX, "name": "mock" },
            "challenge": request.message,
        })))
    }

    async fn create_data_attestation_credential(
        &self,
        request: &CreateCredentialRequest,
    ) -> Result<AttestationCredential, GatewayError> {
        let mut state = self.state.lock();
        state.calls.push(GatewayCall::CreateCredential {
            digest: request.cred_data.digest.clone(),
            schema_said: request.schema_said.to_string(),
        });
        self.require_installed()?;

        if !state.authorized {
            return Err(GatewayError::Rejected {
                operation: "create_data_attestation_credential",
                reason: "authorization required".into(),
            });
        }
        if let Some(err) = Self::fail(state.create, "create_data_attestation_credential") {
            return Err(err);
        }
        if state.create == MockOutcome::Malformed {
            return AttestationCredential::from_result(json!({ "acdc": {} }));
        }

        let seed = format!(
            "{}|{}|{}",
            request.cred_data.digest,
            request.schema_said,
            state.issued.len()
        );
        let said_text = format!("E{}", &sha256_digest(seed.as_bytes()).to_hex()[..43]);
        let ked = json!({
            "v": "ACDC10JSON000000_",
            "d": said_text,
            "i": MOCK_IDENTIFIER_PREFIX,
            "s": request.schema_said.as_str(),
            "a": {
                "digest": request.cred_data.digest,
                "digestAlgo": request.cred_data.digest_algo,
            },
        });

        let credential = AttestationCredential::from_result(json!({ "acdc": { "_ked": ked } }))?;
        let cesr = format!("{ked}-IABB{said_text}");
        state.issued.insert(credential.said.clone(), cesr);
        Ok(credential)
    }

    async fn get_credential(
        &self,
        said: &Said,
        include_raw: bool,
    ) -> Result<RawCredential, GatewayError> {
        let mut state = self.state.lock();
        state.calls.push(GatewayCall::GetCredential {
            said: said.to_string(),
            include_raw,
        });
        self.require_installed()?;

        if let Some(err) = Self::fail(state.fetch, "get_credential") {
            return Err(err);
        }
        let missing = || GatewayError::MalformedResponse {
            operation: "get_credential",
            reason: "unable to get credential: response has no credential field".into(),
        };
        if state.fetch == MockOutcome::Malformed {
            return Err(missing());
        }

        let cesr = state.issued.get(said).cloned().ok_or_else(|| GatewayError::Agent {
            operation: "get_credential",
            status: 404,
            body: format!("unknown credential {said}"),
        })?;
        Ok(RawCredential {
            said: said.clone(),
            cesr,
        })
    }

    fn gateway_name(&self) -> &str {
        "MockExtensionGateway"
    }
}
