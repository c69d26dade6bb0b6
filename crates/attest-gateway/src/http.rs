//! # HTTP Agent Bridge Client
//!
//! Talks JSON over HTTP to a bridge process run by the signing agent on the
//! local machine.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | detect installed | `GET /status` |
//! | configure vendor | `POST /vendor` |
//! | authorize | `POST /authorize` |
//! | create credential | `POST /credentials/data-attestation` |
//! | get credential | `GET /credentials/{said}?includeRaw=<bool>` |
//!
//! Calls that wait on the user get the interaction timeout; probes and
//! fetches get the short probe timeout. Status 499 means the user dismissed
//! the prompt, as does any error whose body is just `cancelled`. 401/403/409
//! mean the agent refused the request.
//! Retries are NOT performed: repeating an authorize would prompt the user twice.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use attest_core::Said;

use crate::config::AgentConfig;
use crate::error::GatewayError;
use crate::types::{
    AttestationCredential, AuthorizationGrant, AuthorizeRequest, CreateCredentialRequest,
    RawCredential, VendorConfig,
};
use crate::ExtensionGateway;

#[derive(Debug, Deserialize)]
struct GetCredentialResponse {
    credential: Option<String>,
}

/// Signing agent reached through its local HTTP bridge.
#[derive(Debug, Clone)]
pub struct HttpExtensionGateway {
    client: reqwest::Client,
    base_url: String,
    interaction_timeout: Duration,
    probe_timeout: Duration,
}

impl HttpExtensionGateway {
    /// Create a gateway from configuration.
    pub fn new(config: AgentConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::Transport {
                operation: "client_init",
                source: e,
            })?;

        Ok(Self {
            client,
            base_url: config.url.as_str().trim_end_matches('/').to_string(),
            interaction_timeout: Duration::from_secs(config.interaction_timeout_secs),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send a request and map non-2xx statuses onto [`GatewayError`].
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<reqwest::Response, GatewayError> {
        let resp = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport { operation, source: e })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(operation, status = status.as_u16(), "agent bridge returned error status");
        Err(match status.as_u16() {
            499 => GatewayError::Cancelled { operation },
            _ if body.trim().eq_ignore_ascii_case("cancelled") => {
                GatewayError::Cancelled { operation }
            }
            401 | 403 | 409 => GatewayError::Rejected {
                operation,
                reason: body,
            },
            code => GatewayError::Agent {
                operation,
                status: code,
                body,
            },
        })
    }

    async fn json_body(
        resp: reqwest::Response,
        operation: &'static str,
    ) -> Result<serde_json::Value, GatewayError> {
        resp.json().await.map_err(|e| GatewayError::MalformedResponse {
            operation,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ExtensionGateway for HttpExtensionGateway {
    async fn detect_installed(&self) -> bool {
        let request = self
            .client
            .get(self.url("status"))
            .timeout(self.probe_timeout);
        match self.send(request, "detect_installed").await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("signing agent not detected: {e}");
                false
            }
        }
    }

    async fn configure_vendor(&self, theme_url: &Url) -> Result<(), GatewayError> {
        let body = VendorConfig {
            url: theme_url.to_string(),
        };
        let request = self
            .client
            .post(self.url("vendor"))
            .timeout(self.probe_timeout)
            .json(&body);
        self.send(request, "configure_vendor").await?;
        Ok(())
    }

    async fn authorize(
        &self,
        request: &AuthorizeRequest,
    ) -> Result<AuthorizationGrant, GatewayError> {
        let operation = "authorize";
        let req = self
            .client
            .post(self.url("authorize"))
            .timeout(self.interaction_timeout)
            .json(request);
        let resp = self.send(req, operation).await?;
        Ok(AuthorizationGrant::from_value(
            Self::json_body(resp, operation).await?,
        ))
    }

    async fn create_data_attestation_credential(
        &self,
        request: &CreateCredentialRequest,
    ) -> Result<AttestationCredential, GatewayError> {
        let operation = "create_data_attestation_credential";
        let req = self
            .client
            .post(self.url("credentials/data-attestation"))
            .timeout(self.interaction_timeout)
            .json(request);
        let resp = self.send(req, operation).await?;
        AttestationCredential::from_result(Self::json_body(resp, operation).await?)
    }

    async fn get_credential(
        &self,
        said: &Said,
        include_raw: bool,
    ) -> Result<RawCredential, GatewayError> {
        let operation = "get_credential";
        let req = self
            .client
            .get(self.url(&format!("credentials/{said}")))
            .query(&[("includeRaw", include_raw)])
            .timeout(self.probe_timeout);
        let resp = self.send(req, operation).await?;
        let body: GetCredentialResponse =
            resp.json().await.map_err(|e| GatewayError::MalformedResponse {
                operation,
                reason: e.to_string(),
            })?;

        let cesr = body
            .credential
            .filter(|c| !c.is_empty())
            .ok_or_else(|| GatewayError::MalformedResponse {
                operation,
                reason: "unable to get credential: response has no credential field".into(),
            })?;
        Ok(RawCredential {
            said: said.clone(),
            cesr,
        })
    }

    fn gateway_name(&self) -> &str {
        "HttpExtensionGateway"
    }
}
