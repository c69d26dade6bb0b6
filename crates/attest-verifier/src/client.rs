//! Verification service client.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use url::Url;

use attest_core::{parse_digest_from_filename, CoreError};

use crate::config::VerifierConfig;
use crate::error::VerificationError;
use crate::retry::retry_send;

/// Multipart field the service reads the archive from.
pub const UPLOAD_FIELD: &str = "file";

/// A 2xx answer from the verification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    /// Digest recovered from the archive filename.
    pub expected_digest: String,
    pub archive_filename: String,
    pub status: u16,
    /// Response body, uninterpreted.
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    msg: String,
}

/// Client for the remote verification service.
#[derive(Debug, Clone)]
pub struct VerificationClient {
    http: reqwest::Client,
    config: VerifierConfig,
}

impl VerificationClient {
    pub fn new(config: VerifierConfig) -> Result<Self, VerificationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VerificationError::Transport {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self { http, config })
    }

    pub fn endpoint(&self) -> &Url {
        &self.config.endpoint
    }

    /// Submit an archive held in memory.
    ///
    /// The expected digest is parsed from `archive_filename` first; a name
    /// without a `digest=` value fails before any request is made. The
    /// archive bytes are sent unchanged as multipart field `file`.
    pub async fn submit_for_verification(
        &self,
        archive: &[u8],
        archive_filename: &str,
    ) -> Result<VerificationOutcome, VerificationError> {
        let expected_digest = parse_digest_from_filename(archive_filename)
            .map_err(VerificationError::MalformedArchiveName)?;
        let upload_name = archive_filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(archive_filename);

        let endpoint = &self.config.endpoint;
        tracing::info!(
            archive = upload_name,
            expected_digest = %expected_digest,
            endpoint = %endpoint,
            size = archive.len(),
            "submitting archive for verification"
        );

        let resp = retry_send(self.config.max_retries, || {
            let request = self.http.post(endpoint.clone());
            let bytes = archive.to_vec();
            let name = upload_name.to_string();
            async move {
                let part = Part::bytes(bytes)
                    .file_name(name)
                    .mime_str("application/zip")?;
                request
                    .multipart(Form::new().part(UPLOAD_FIELD, part))
                    .send()
                    .await
            }
        })
        .await
        .map_err(|e| VerificationError::Transport {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| VerificationError::Transport {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), archive = upload_name, "verification rejected");
            return Err(VerificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(status = status.as_u16(), archive = upload_name, "verification accepted");
        Ok(VerificationOutcome {
            expected_digest,
            archive_filename: upload_name.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    /// Read an archive from disk and submit it under its file name.
    pub async fn submit_archive_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<VerificationOutcome, VerificationError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                VerificationError::MalformedArchiveName(CoreError::MalformedArchiveName {
                    filename: path.display().to_string(),
                    reason: "path has no UTF-8 file name",
                })
            })?;
        parse_digest_from_filename(filename).map_err(VerificationError::MalformedArchiveName)?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| VerificationError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
        self.submit_for_verification(&bytes, filename).await
    }

    /// Probe the service's `/health` endpoint and return its message.
    pub async fn health(&self) -> Result<String, VerificationError> {
        let url = self.config.health_url()?;
        let resp = retry_send(self.config.max_retries, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| VerificationError::Transport {
                endpoint: url.to_string(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VerificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let health: HealthResponse =
            resp.json()
                .await
                .map_err(|e| VerificationError::MalformedResponse {
                    endpoint: url.to_string(),
                    reason: e.to_string(),
                })?;
        tracing::debug!(msg = %health.msg, "verifier healthy");
        Ok(health.msg)
    }
}
