//! Extension gateway error types.

/// Errors from signing-agent calls.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The signing agent is not installed or not reachable.
    #[error("signing agent is not installed")]
    NotInstalled,

    /// The user dismissed the agent's prompt.
    #[error("{operation} was cancelled by the user")]
    Cancelled {
        /// The operation that was cancelled.
        operation: &'static str,
    },

    /// The agent refused the request (e.g. create without prior authorize).
    #[error("{operation} rejected by signing agent: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },

    /// HTTP transport error talking to the agent bridge.
    #[error("transport error calling {operation}: {source}")]
    Transport {
        operation: &'static str,
        source: reqwest::Error,
    },

    /// The agent bridge returned a non-2xx status.
    #[error("signing agent {operation} returned {status}: {body}")]
    Agent {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The agent answered with something this crate cannot interpret.
    #[error("malformed {operation} response: {reason}")]
    MalformedResponse {
        operation: &'static str,
        reason: String,
    },
}

impl GatewayError {
    /// Whether the failure came from the user backing out of a prompt.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
