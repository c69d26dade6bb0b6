//! Verification error types.

use attest_core::CoreError;

/// Errors from submitting an archive for verification.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// The archive filename does not carry a `digest=` value. Nothing was sent.
    #[error("archive name does not carry a digest: {0}")]
    MalformedArchiveName(#[source] CoreError),

    /// The service could not be reached or the connection failed. The
    /// message includes the full cause chain (e.g. `Connection refused`).
    #[error("transport error calling {endpoint}: {}", cause_chain(.source))]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Rejected { status: u16, body: String },

    /// The health endpoint answered with something other than `{"msg": ...}`.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// Reading the archive from disk failed.
    #[error("failed to read archive {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Render an error and every `source()` below it, joined with `: `.
///
/// reqwest keeps the underlying cause (refused connection, DNS failure,
/// timeout) out of its own `Display`.
pub(crate) fn cause_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut next = err.source();
    while let Some(cause) = next {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        next = cause.source();
    }
    message
}

impl VerificationError {
    /// HTTP status surfaced by the service, if it answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
