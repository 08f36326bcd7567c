//! The poll cycle state machine.
//!
//! # States
//! ```text
//! AwaitingIdentifier → Querying(id) → ResolvedSuccess
//!                                   → ResolvedFailure
//!                                   → ScheduledRetry → AwaitingIdentifier
//! AwaitingIdentifier → ScheduledRetry   (identifier not rendered yet)
//! ```
//!
//! # Design Decisions
//! - One loop drives every transition; the next query is only scheduled after
//!   the previous one resolved, so queries never overlap
//! - Transient failures take the same transition as a non-terminal status
//!   unless a consecutive-failure budget is configured
//! - No retry limit otherwise; the deadline guard bounds the wait

use tokio::time::{sleep, Instant};

use crate::config::PollerConfig;
use crate::lifecycle::CancelListener;
use crate::observability::metrics;
use crate::page::Page;
use crate::poller::client::StatusSource;
use crate::poller::outcome::{FailureReason, PollStats};
use crate::poller::resolver::IdentifierResolver;
use crate::poller::status::{CorrelationId, PollResult, PollStatus, StatusPayload};

/// Where the cycle currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    AwaitingIdentifier,
    Querying(CorrelationId),
    ScheduledRetry,
    ResolvedSuccess,
    ResolvedFailure,
}

/// Why another attempt was scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryCause {
    IdentifierAbsent,
    NonTerminal(PollStatus),
    Transient,
}

/// Terminal result of the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Success(PollStatus),
    Failure(FailureReason),
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Retry(RetryCause),
    Resolve(Resolution),
}

/// Drives status queries for one session.
pub struct PollCycle<'a, P: ?Sized, S> {
    config: &'a PollerConfig,
    page: &'a P,
    source: &'a S,
    resolver: IdentifierResolver,
    state: PollState,
    stats: PollStats,
    last_identifier: Option<CorrelationId>,
}

impl<'a, P: Page + ?Sized, S: StatusSource> PollCycle<'a, P, S> {
    pub fn new(config: &'a PollerConfig, page: &'a P, source: &'a S) -> Self {
        Self {
            config,
            page,
            source,
            resolver: IdentifierResolver::new(config.page.identifier_field.clone()),
            state: PollState::AwaitingIdentifier,
            stats: PollStats::default(),
            last_identifier: None,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Identifier used by the most recent query.
    pub fn last_identifier(&self) -> Option<&CorrelationId> {
        self.last_identifier.as_ref()
    }

    /// Run until a terminal status is observed or the listener is cancelled.
    ///
    /// Returns `None` when cancelled; an in-flight query is dropped.
    pub async fn run(&mut self, cancel: &mut CancelListener) -> Option<Resolution> {
        let delay = self.config.retry_delay();

        loop {
            if cancel.is_cancelled() {
                return None;
            }

            let transition = tokio::select! {
                biased;
                _ = cancel.cancelled() => return None,
                transition = self.step() => transition,
            };

            match transition {
                Transition::Resolve(resolution) => return Some(resolution),
                Transition::Retry(cause) => {
                    tracing::trace!(
                        cause = ?cause,
                        delay_ms = self.config.retry.delay_ms,
                        "Scheduling next poll"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return None,
                        _ = sleep(delay) => {}
                    }
                }
            }
        }
    }

    /// One attempt: resolve the identifier, query, interpret.
    pub async fn step(&mut self) -> Transition {
        self.state = PollState::AwaitingIdentifier;

        let Some(id) = self.resolver.resolve(self.page) else {
            self.stats.identifier_retries += 1;
            self.state = PollState::ScheduledRetry;
            metrics::record_identifier_retry();
            tracing::debug!(
                field = %self.resolver.field(),
                attempt = self.stats.identifier_retries,
                "Identifier not on page yet"
            );
            return Transition::Retry(RetryCause::IdentifierAbsent);
        };

        self.last_identifier = Some(id.clone());
        self.state = PollState::Querying(id.clone());
        self.stats.queries += 1;

        let started = Instant::now();
        let result = self.source.query(&id).await;
        let transition = self.interpret(result);

        metrics::record_query(outcome_label(&transition), started.elapsed());
        transition
    }

    /// Decide the next transition for a query result.
    pub fn interpret(&mut self, result: PollResult<StatusPayload>) -> Transition {
        let statuses = &self.config.statuses;

        match result {
            Ok(payload) => {
                self.stats.consecutive_failures = 0;
                let status = payload.poll_status();

                if payload.status == statuses.success {
                    tracing::info!(status = %status, "Operation succeeded");
                    self.state = PollState::ResolvedSuccess;
                    Transition::Resolve(Resolution::Success(status))
                } else if statuses.terminal_failures.contains(&payload.status) {
                    tracing::info!(status = %status, "Operation ended on the failure path");
                    self.state = PollState::ResolvedFailure;
                    Transition::Resolve(Resolution::Failure(FailureReason::TerminalStatus(
                        payload.status,
                    )))
                } else {
                    self.stats.pending_responses += 1;
                    tracing::debug!(status = %status, query = self.stats.queries, "Still pending");
                    self.state = PollState::ScheduledRetry;
                    Transition::Retry(RetryCause::NonTerminal(status))
                }
            }
            Err(e) => {
                self.stats.transient_failures += 1;
                self.stats.consecutive_failures += 1;
                tracing::debug!(
                    error = %e,
                    consecutive = self.stats.consecutive_failures,
                    "Status query failed, treating as pending"
                );

                let exhausted = self
                    .config
                    .retry
                    .max_consecutive_failures
                    .is_some_and(|max| self.stats.consecutive_failures >= max);

                if exhausted {
                    tracing::warn!(
                        consecutive = self.stats.consecutive_failures,
                        "Giving up after repeated transport failures"
                    );
                    self.state = PollState::ResolvedFailure;
                    Transition::Resolve(Resolution::Failure(FailureReason::TransportExhausted))
                } else {
                    self.state = PollState::ScheduledRetry;
                    Transition::Retry(RetryCause::Transient)
                }
            }
        }
    }
}

fn outcome_label(transition: &Transition) -> &'static str {
    match transition {
        Transition::Resolve(Resolution::Success(_)) => "success",
        Transition::Resolve(Resolution::Failure(_)) => "failure",
        Transition::Retry(RetryCause::Transient) => "transient",
        Transition::Retry(_) => "pending",
    }
}
