//! Status payloads and poll errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Correlation identifier of one pending server-side operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Wrap a raw value. Empty values are not identifiers.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status reported by the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    Pending,
    Approved,
    Registered,
    Rejected,
    Expired,
    NotFound,
    /// Any value the poller has no name for.
    Other(String),
}

impl PollStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PollStatus::Pending => "PENDING",
            PollStatus::Approved => "APPROVED",
            PollStatus::Registered => "REGISTERED",
            PollStatus::Rejected => "REJECTED",
            PollStatus::Expired => "EXPIRED",
            PollStatus::NotFound => "NOT_FOUND",
            PollStatus::Other(raw) => raw,
        }
    }
}

impl From<&str> for PollStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "PENDING" => PollStatus::Pending,
            "APPROVED" => PollStatus::Approved,
            "REGISTERED" => PollStatus::Registered,
            "REJECTED" => PollStatus::Rejected,
            "EXPIRED" => PollStatus::Expired,
            "NOT_FOUND" => PollStatus::NotFound,
            other => PollStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for PollStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a status response. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusPayload {
    pub status: String,
}

impl StatusPayload {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }

    /// Parse a response body.
    pub fn from_json(body: &[u8]) -> PollResult<Self> {
        serde_json::from_slice(body).map_err(|e| PollError::Malformed(e.to_string()))
    }

    pub fn poll_status(&self) -> PollStatus {
        PollStatus::from(self.status.as_str())
    }
}

/// Errors that can occur while querying status.
///
/// None of these reach the caller of a session; each one is a transient
/// failure that schedules another attempt.
#[derive(Debug, Error)]
pub enum PollError {
    /// Connection, timeout or protocol failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The authority answered with a non-success HTTP status.
    #[error("authority returned HTTP {0}")]
    HttpStatus(u16),

    /// Body was not a JSON object with a string `status`.
    #[error("malformed status payload: {0}")]
    Malformed(String),

    /// The endpoint template did not expand to a valid URL.
    #[error("invalid status endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Result type for status queries.
pub type PollResult<T> = Result<T, PollError>;
