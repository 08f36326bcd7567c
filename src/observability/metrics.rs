//! Metrics collection.
//!
//! # Metrics
//! - `poller_queries_total{outcome}` (counter): status queries by outcome
//! - `poller_query_duration_seconds` (histogram): query latency
//! - `poller_identifier_retries_total` (counter): attempts without identifier
//! - `poller_sessions_total{conclusion,reason}` (counter): concluded sessions
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host decides whether to
//!   install a recorder, otherwise every call is a no-op

use std::time::Duration;

/// Record one status query.
pub fn record_query(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("poller_queries_total", "outcome" => outcome).increment(1);
    metrics::histogram!("poller_query_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record an attempt that found no identifier on the page.
pub fn record_identifier_retry() {
    metrics::counter!("poller_identifier_retries_total").increment(1);
}

/// Record a concluded session.
pub fn record_session(conclusion: &'static str, reason: String) {
    metrics::counter!("poller_sessions_total", "conclusion" => conclusion, "reason" => reason)
        .increment(1);
}
