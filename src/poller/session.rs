//! Poll session: the composition root.
//!
//! # Responsibilities
//! - Start the poll cycle, deadline guard and countdown at the same instant
//! - Settle exactly one conclusion and perform its page action
//! - Cancel whatever is still running once settled
//! - Report what happened

use serde::Serialize;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{FlowVariant, PollerConfig};
use crate::deadline::{Countdown, DeadlineGuard};
use crate::lifecycle::{Cancellation, Settlement};
use crate::observability::metrics;
use crate::page::{Page, PageActions};
use crate::poller::client::StatusSource;
use crate::poller::cycle::{PollCycle, Resolution};
use crate::poller::outcome::{Conclusion, FailureReason, PollStats};
use crate::poller::status::CorrelationId;

/// What a finished session looked like.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub flow: FlowVariant,
    /// Identifier used by the last status query.
    pub identifier: Option<CorrelationId>,
    /// `None` only if the host cancelled the session before any outcome.
    pub conclusion: Option<Conclusion>,
    pub stats: PollStats,
    /// Deadline in effect, if the guard ran.
    pub deadline_secs: Option<u64>,
    pub elapsed_ms: u64,
}

/// One page session waiting for a pending operation.
pub struct PollSession<'a, P: ?Sized, S, A: ?Sized> {
    config: &'a PollerConfig,
    page: &'a P,
    source: &'a S,
    actions: &'a A,
}

impl<'a, P, S, A> PollSession<'a, P, S, A>
where
    P: Page + ?Sized,
    S: StatusSource,
    A: PageActions + ?Sized,
{
    pub fn new(config: &'a PollerConfig, page: &'a P, source: &'a S, actions: &'a A) -> Self {
        Self {
            config,
            page,
            source,
            actions,
        }
    }

    /// Run until a conclusion is settled.
    pub async fn run(&self) -> SessionReport {
        self.run_with(&Cancellation::new()).await
    }

    /// Run with a host-owned cancellation; triggering it ends the session
    /// without a page action.
    pub async fn run_with(&self, cancel: &Cancellation) -> SessionReport {
        let session_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "poll_session",
            session_id = %session_id,
            flow = self.config.flow.as_str()
        );
        self.drive(session_id, cancel).instrument(span).await
    }

    async fn drive(&self, session_id: Uuid, cancel: &Cancellation) -> SessionReport {
        let started = Instant::now();
        let settlement = Settlement::new();

        let guard = self
            .config
            .deadline
            .enabled
            .then(|| DeadlineGuard::from_page(self.page, self.config));
        let countdown = guard
            .filter(|_| self.config.deadline.countdown)
            .map(|g| Countdown::new(g.timeout_secs(), &self.config.page));

        let mut cycle = PollCycle::new(self.config, self.page, self.source);
        let mut poll_cancel = cancel.subscribe();
        let mut guard_cancel = cancel.subscribe();
        let mut countdown_cancel = cancel.subscribe();

        tracing::info!(
            deadline_secs = guard.map(|g| g.timeout_secs()),
            retry_delay_ms = self.config.retry.delay_ms,
            identifier_field = %self.config.page.identifier_field,
            "Poll session started"
        );

        let poll = async {
            if let Some(resolution) = cycle.run(&mut poll_cancel).await {
                let conclusion = match resolution {
                    Resolution::Success(status) => Conclusion::Succeeded {
                        status: status.to_string(),
                        form: self.config.page.success_form.clone(),
                    },
                    Resolution::Failure(reason) => self.failed(reason),
                };
                self.conclude(&settlement, cancel, conclusion);
            }
        };

        let deadline = async {
            if let Some(guard) = &guard {
                if guard.expire(started, &mut guard_cancel).await {
                    tracing::warn!(
                        timeout_secs = guard.timeout_secs(),
                        "Deadline reached before a terminal status"
                    );
                    self.conclude(&settlement, cancel, self.failed(FailureReason::DeadlineExceeded));
                }
            }
        };

        let display = async {
            if let Some(countdown) = &countdown {
                countdown.run(self.page, started, &mut countdown_cancel).await;
            }
        };

        tokio::join!(poll, deadline, display);

        let report = SessionReport {
            session_id,
            flow: self.config.flow,
            identifier: cycle.last_identifier().cloned(),
            conclusion: settlement.into_inner(),
            stats: cycle.stats(),
            deadline_secs: guard.map(|g| g.timeout_secs()),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        match &report.conclusion {
            Some(conclusion) => tracing::info!(
                outcome = conclusion.kind(),
                reason = %conclusion.reason_code(),
                queries = report.stats.queries,
                elapsed_ms = report.elapsed_ms,
                "Poll session finished"
            ),
            None => tracing::info!(queries = report.stats.queries, "Poll session cancelled"),
        }

        report
    }

    fn failed(&self, reason: FailureReason) -> Conclusion {
        Conclusion::Failed {
            destination: self.config.failure.destination_for(reason.code()),
            reason,
        }
    }

    /// First caller wins; later outcomes are dropped without side effects.
    fn conclude(&self, settlement: &Settlement<Conclusion>, cancel: &Cancellation, conclusion: Conclusion) {
        if cancel.is_triggered() || !settlement.settle(conclusion.clone()) {
            tracing::debug!(outcome = conclusion.kind(), "Session already over, ignoring outcome");
            return;
        }

        match &conclusion {
            Conclusion::Succeeded { form, .. } => self.actions.submit_form(form),
            Conclusion::Failed { destination, .. } => self.actions.navigate(destination),
        }
        metrics::record_session(conclusion.kind(), conclusion.reason_code());

        cancel.trigger();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{PageAction, RecordingActions, StaticPage};
    use crate::poller::status::{PollResult, StatusPayload};

    struct Always(&'static str);

    impl StatusSource for Always {
        async fn query(&self, _id: &CorrelationId) -> PollResult<StatusPayload> {
            Ok(StatusPayload::new(self.0))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_registration_success_submits_form() {
        let config = PollerConfig::for_flow(FlowVariant::Registration);
        let page = StaticPage::new().with_input("regRequestId", "req-1");
        let actions = RecordingActions::new();

        let report = PollSession::new(&config, &page, &Always("REGISTERED"), &actions)
            .run()
            .await;

        assert_eq!(actions.performed(), vec![PageAction::Submit("registration-form".into())]);
        assert!(report.conclusion.unwrap().is_success());
        assert_eq!(report.identifier.unwrap().as_str(), "req-1");
        assert_eq!(report.deadline_secs, Some(45));
        assert_eq!(report.elapsed_ms, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_host_cancellation_performs_no_action() {
        let config = PollerConfig::default();
        let page = StaticPage::new().with_input("pushAuthPushId", "p-1");
        let actions = RecordingActions::new();
        let cancel = Cancellation::new();

        let source = Always("PENDING");
        let session = PollSession::new(&config, &page, &source, &actions);
        let stop = async {
            tokio::time::sleep(std::time::Duration::from_secs(3)).await;
            cancel.trigger();
        };
        let (report, ()) = tokio::join!(session.run_with(&cancel), stop);

        assert!(report.conclusion.is_none());
        assert!(actions.performed().is_empty());
        assert_eq!(report.stats.queries, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_key_flow_has_no_deadline() {
        let config = PollerConfig::for_flow(FlowVariant::PushKey);
        let page = StaticPage::new().with_input("pushAuthKeyId", "key-9");
        let actions = RecordingActions::new();

        let report = PollSession::new(&config, &page, &Always("REJECTED"), &actions)
            .run()
            .await;

        assert_eq!(report.deadline_secs, None);
        assert_eq!(actions.navigations(), vec!["/cas/login?pushFailed=true".to_string()]);
        assert_eq!(page.text("countdown-number"), None);
    }
}
