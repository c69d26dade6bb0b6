//! User-facing verification verdict.

use crate::client::VerificationOutcome;
use crate::error::VerificationError;

/// Pass/fail framing of a submission. The service's body is shown as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationReport {
    Passed(VerificationOutcome),
    Failed(String),
}

impl VerificationReport {
    pub fn from_result(result: Result<VerificationOutcome, VerificationError>) -> Self {
        match result {
            Ok(outcome) => Self::Passed(outcome),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed(_))
    }
}

impl std::fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed(outcome) => write!(f, "Verification result: {}", outcome.body),
            Self::Failed(message) => write!(f, "Verification failed: {message}"),
        }
    }
}
