//! Session outcomes and attempt statistics.

use serde::{Serialize, Serializer};

/// Why a session ended on the failure path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The authority reported a failure-terminal status (e.g., `REJECTED`).
    TerminalStatus(String),
    /// Too many consecutive transport failures.
    TransportExhausted,
    /// The deadline guard fired first.
    DeadlineExceeded,
}

impl FailureReason {
    /// Code used for reason flags, logs and metrics.
    pub fn code(&self) -> &str {
        match self {
            FailureReason::TerminalStatus(status) => status,
            FailureReason::TransportExhausted => "UNAVAILABLE",
            FailureReason::DeadlineExceeded => "DEADLINE",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for FailureReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// The single settled result of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Conclusion {
    /// Success status observed; the form was submitted.
    Succeeded { status: String, form: String },
    /// Failure path taken; the page navigated away.
    Failed {
        reason: FailureReason,
        destination: String,
    },
}

impl Conclusion {
    pub fn is_success(&self) -> bool {
        matches!(self, Conclusion::Succeeded { .. })
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Conclusion::Succeeded { .. } => "succeeded",
            Conclusion::Failed { .. } => "failed",
        }
    }

    pub(crate) fn reason_code(&self) -> String {
        match self {
            Conclusion::Succeeded { status, .. } => status.clone(),
            Conclusion::Failed { reason, .. } => reason.code().to_string(),
        }
    }
}

/// Attempt counters of one poll session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollStats {
    /// Attempts that found no identifier on the page.
    pub identifier_retries: u32,
    /// Status queries issued.
    pub queries: u32,
    /// Responses with a non-terminal status.
    pub pending_responses: u32,
    /// Transport, HTTP or payload failures.
    pub transient_failures: u32,
    /// Current streak of transient failures.
    pub consecutive_failures: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(FailureReason::TerminalStatus("EXPIRED".into()).code(), "EXPIRED");
        assert_eq!(FailureReason::TransportExhausted.code(), "UNAVAILABLE");
        assert_eq!(FailureReason::DeadlineExceeded.to_string(), "DEADLINE");
    }

    #[test]
    fn test_conclusion_serialization() {
        let failed = Conclusion::Failed {
            reason: FailureReason::DeadlineExceeded,
            destination: "/cas/login".into(),
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({"outcome": "failed", "reason": "DEADLINE", "destination": "/cas/login"})
        );
        assert!(!failed.is_success());
    }
}
