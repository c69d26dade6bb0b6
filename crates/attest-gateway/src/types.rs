//! Wire types exchanged with the signing agent.
//!
//! Field names follow the agent's JSON API (`credData`, `digestAlgo`,
//! `schemaSaid`). Results the workflow does not interpret stay opaque
//! `serde_json::Value`s.

use serde::{Deserialize, Serialize};

use attest_core::{ContentDigest, Said, SchemaSaid};

use crate::error::GatewayError;

// -- Authorization -------------------------------------------------------------

/// Challenge presented to the user when selecting an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    pub message: String,
}

impl AuthorizeRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A fresh challenge of the form `Message <unix-millis>`.
    pub fn challenge_now() -> Self {
        Self::new(format!("Message {}", chrono::Utc::now().timestamp_millis()))
    }
}

/// Result of a successful authorize call: the identity the user selected.
///
/// Opaque to the workflow; only the identifier prefix is surfaced for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationGrant(serde_json::Value);

impl AuthorizationGrant {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// The selected identifier prefix, if the agent disclosed one.
    pub fn identifier_prefix(&self) -> Option<&str> {
        self.0.pointer("/identifier/prefix").and_then(|v| v.as_str())
    }
}

// -- Credential issuance -------------------------------------------------------

/// Claim data of a data-attestation credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialData {
    pub digest: String,
    #[serde(rename = "digestAlgo")]
    pub digest_algo: String,
}

impl CredentialData {
    /// Claim data for a computed content digest.
    pub fn for_digest(digest: &ContentDigest) -> Self {
        Self {
            digest: digest.to_hex(),
            digest_algo: digest.algorithm.wire_label().to_string(),
        }
    }
}

/// Request body for `createDataAttestationCredential`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCredentialRequest {
    #[serde(rename = "credData")]
    pub cred_data: CredentialData,
    #[serde(rename = "schemaSaid")]
    pub schema_said: SchemaSaid,
}

impl CreateCredentialRequest {
    pub fn new(digest: &ContentDigest, schema_said: SchemaSaid) -> Self {
        Self {
            cred_data: CredentialData::for_digest(digest),
            schema_said,
        }
    }
}

/// An issued attestation credential, keyed by its SAID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttestationCredential {
    pub said: Said,
    /// The agent's full create-credential result.
    pub result: serde_json::Value,
}

impl AttestationCredential {
    /// Interpret an agent create-credential result.
    ///
    /// The credential SAID is read from `acdc._ked.d`.
    pub fn from_result(result: serde_json::Value) -> Result<Self, GatewayError> {
        let said = result
            .pointer("/acdc/_ked/d")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GatewayError::MalformedResponse {
                operation: "create_data_attestation_credential",
                reason: "result has no acdc._ked.d".into(),
            })?;
        let said = Said::new(said).map_err(|e| GatewayError::MalformedResponse {
            operation: "create_data_attestation_credential",
            reason: e.to_string(),
        })?;
        Ok(Self { said, result })
    }
}

// -- Credential retrieval ------------------------------------------------------

/// Serialized (CESR) form of a credential as returned by `getCredential`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCredential {
    pub said: Said,
    pub cesr: String,
}

impl RawCredential {
    pub fn as_bytes(&self) -> &[u8] {
        self.cesr.as_bytes()
    }
}

/// Theme configuration applied to the agent's UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorConfig {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_core::sha256_digest;
    use serde_json::json;

    #[test]
    fn create_request_uses_agent_field_names() {
        let digest = sha256_digest(b"abc");
        let schema = SchemaSaid::new("ENDcMNUZjag27T_GTxiCmB2kYstg_kqipqz39906E_FD").unwrap();
        let req = CreateCredentialRequest::new(&digest, schema);

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "credData": {
                    "digest": "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
                    "digestAlgo": "SHA-256"
                },
                "schemaSaid": "ENDcMNUZjag27T_GTxiCmB2kYstg_kqipqz39906E_FD"
            })
        );
    }

    #[test]
    fn credential_said_extracted_from_result() {
        let result = json!({"acdc": {"_ked": {"d": "EAbc_123", "a": {}}}});
        let cred = AttestationCredential::from_result(result).unwrap();
        assert_eq!(cred.said.as_str(), "EAbc_123");
    }

    #[test]
    fn credential_without_said_is_malformed() {
        let err = AttestationCredential::from_result(json!({"acdc": {}})).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse { .. }));
    }

    #[test]
    fn challenge_has_message_prefix() {
        let req = AuthorizeRequest::challenge_now();
        let millis = req.message.strip_prefix("Message ").unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn grant_exposes_identifier_prefix() {
        let grant = AuthorizationGrant::from_value(json!({"identifier": {"prefix": "EPrefix"}}));
        assert_eq!(grant.identifier_prefix(), Some("EPrefix"));
        assert_eq!(AuthorizationGrant::from_value(json!({})).identifier_prefix(), None);
    }
}
