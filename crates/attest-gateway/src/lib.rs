//! # attest-gateway -- Signing Agent Boundary
//!
//! The signing agent is an out-of-process application that holds the
//! user's keys and issues credentials. This crate defines the
//! [`ExtensionGateway`] trait the workflow consumes, plus two
//! implementations:
//!
//! - [`MockExtensionGateway`]: scriptable in-memory agent for tests and demos.
//! - [`HttpExtensionGateway`]: JSON over HTTP to a locally running agent bridge.
//!
//! ## Call Contract
//!
//! 1. `detect_installed` resolves once and never fails; an unreachable agent
//!    is reported as not installed.
//! 2. `authorize` suspends on user interaction and may be cancelled by the
//!    user. It must be repeated for every signing session.
//! 3. `create_data_attestation_credential` requires a prior successful
//!    `authorize` in the same session.
//! 4. `get_credential` fetches the serialized credential by SAID.
//!
//! The gateway is passed into the workflow as an `Arc<dyn ExtensionGateway>`;
//! there is no process-wide client instance.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod types;

pub use config::{AgentConfig, ConfigError};
pub use error::GatewayError;
pub use http::HttpExtensionGateway;
pub use mock::{GatewayCall, MockExtensionGateway, MockOutcome};
pub use types::{
    AttestationCredential, AuthorizationGrant, AuthorizeRequest, CreateCredentialRequest,
    CredentialData, RawCredential, VendorConfig,
};

use async_trait::async_trait;
use attest_core::Said;
use url::Url;

/// Operations the workflow consumes from the signing agent.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc`. The trait is object-safe to support runtime selection
/// (mock vs. live).
#[async_trait]
pub trait ExtensionGateway: Send + Sync {
    /// Probe whether the agent is present.
    async fn detect_installed(&self) -> bool;

    /// Apply a vendor theme to the agent's UI.
    async fn configure_vendor(&self, theme_url: &Url) -> Result<(), GatewayError>;

    /// Ask the user to select an identity for signing.
    async fn authorize(&self, request: &AuthorizeRequest)
        -> Result<AuthorizationGrant, GatewayError>;

    /// Issue a data-attestation credential over a digest.
    async fn create_data_attestation_credential(
        &self,
        request: &CreateCredentialRequest,
    ) -> Result<AttestationCredential, GatewayError>;

    /// Fetch the serialized form of a previously issued credential.
    async fn get_credential(
        &self,
        said: &Said,
        include_raw: bool,
    ) -> Result<RawCredential, GatewayError>;

    /// Human-readable name of this implementation (for logging).
    fn gateway_name(&self) -> &str;
}
