//! Wall-clock deadline for one session.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

use crate::config::PollerConfig;
use crate::lifecycle::CancelListener;
use crate::page::Page;

/// Longest deadline a guard will arm: `i32::MAX` milliseconds, the most a
/// browser `setTimeout` accepts.
pub const MAX_TIMEOUT_SECS: u64 = i32::MAX as u64 / 1000;

/// One-shot timer that forces the failure path when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineGuard {
    timeout_secs: u64,
}

impl DeadlineGuard {
    /// Timeouts above [`MAX_TIMEOUT_SECS`] are clamped.
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout_secs: timeout_secs.min(MAX_TIMEOUT_SECS),
        }
    }

    /// Read the timeout from the page's countdown container, falling back to
    /// the configured timeout.
    pub fn from_page<P: Page + ?Sized>(page: &P, config: &PollerConfig) -> Self {
        let raw = page.data_attribute(
            &config.page.countdown_container,
            &config.page.redirect_seconds_attribute,
        );

        let timeout_secs = match parse_redirect_seconds(raw.as_deref()) {
            Some(secs) => secs,
            None => {
                if let Some(raw) = &raw {
                    tracing::debug!(
                        value = %raw,
                        fallback = config.deadline.timeout_secs,
                        "Unusable redirect seconds on page"
                    );
                }
                config.deadline.timeout_secs
            }
        };

        Self::new(timeout_secs)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Wait until `started + timeout`.
    ///
    /// Returns `true` if the deadline fired, `false` if cancelled first.
    pub async fn expire(&self, started: Instant, cancel: &mut CancelListener) -> bool {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = sleep_until(started + self.timeout()) => true,
        }
    }
}

/// Parse a timeout attribute the way the page templates write it: optional
/// sign, leading decimal digits, anything after them ignored.
///
/// `None` only when there are no digits. Zero and negative values mean the
/// deadline is already due; values too large for a timer saturate.
pub fn parse_redirect_seconds(raw: Option<&str>) -> Option<u64> {
    let trimmed = raw?.trim_start();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];

    if digits.is_empty() {
        return None;
    }
    if negative {
        return Some(0);
    }
    // only overflow can fail past this point
    Some(digits.parse::<u64>().unwrap_or(u64::MAX).min(MAX_TIMEOUT_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Cancellation;
    use crate::page::StaticPage;

    #[test]
    fn test_parse_redirect_seconds() {
        assert_eq!(parse_redirect_seconds(Some("30")), Some(30));
        assert_eq!(parse_redirect_seconds(Some(" 12s")), Some(12));
        assert_eq!(parse_redirect_seconds(Some("+7")), Some(7));
        assert_eq!(parse_redirect_seconds(Some("")), None);
        assert_eq!(parse_redirect_seconds(Some("abc")), None);
        assert_eq!(parse_redirect_seconds(Some("-")), None);
        assert_eq!(parse_redirect_seconds(None), None);
    }

    #[test]
    fn test_non_positive_redirect_seconds_are_due_now() {
        assert_eq!(parse_redirect_seconds(Some("0")), Some(0));
        assert_eq!(parse_redirect_seconds(Some("-5")), Some(0));
        assert_eq!(parse_redirect_seconds(Some("-0s")), Some(0));
    }

    #[test]
    fn test_huge_redirect_seconds_saturate() {
        assert_eq!(parse_redirect_seconds(Some("18446744073709551615")), Some(MAX_TIMEOUT_SECS));
        assert_eq!(parse_redirect_seconds(Some("99999999999999999999999")), Some(MAX_TIMEOUT_SECS));
        assert_eq!(DeadlineGuard::new(u64::MAX).timeout_secs(), MAX_TIMEOUT_SECS);
    }

    #[test]
    fn test_timeout_from_page_or_config() {
        let config = PollerConfig::default();

        let page = StaticPage::new().with_attribute("countdown", "redirect-seconds", "20");
        assert_eq!(DeadlineGuard::from_page(&page, &config).timeout_secs(), 20);

        let page = StaticPage::new().with_attribute("countdown", "redirect-seconds", "soon");
        assert_eq!(DeadlineGuard::from_page(&page, &config).timeout_secs(), 45);

        let page = StaticPage::new().with_attribute("countdown", "redirect-seconds", "0");
        assert_eq!(DeadlineGuard::from_page(&page, &config).timeout_secs(), 0);

        assert_eq!(DeadlineGuard::from_page(&StaticPage::new(), &config).timeout_secs(), 45);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_at_deadline() {
        let cancel = Cancellation::new();
        let mut listener = cancel.subscribe();
        let started = Instant::now();

        assert!(DeadlineGuard::new(5).expire(started, &mut listener).await);
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_fires_immediately() {
        let cancel = Cancellation::new();
        let mut listener = cancel.subscribe();
        let started = Instant::now();

        assert!(DeadlineGuard::new(0).expire(started, &mut listener).await);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clamped_deadline_can_be_armed() {
        let cancel = Cancellation::new();
        let mut listener = cancel.subscribe();
        cancel.trigger();

        let guard = DeadlineGuard::new(u64::MAX);
        assert!(!guard.expire(Instant::now(), &mut listener).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_beats_deadline() {
        let cancel = Cancellation::new();
        let mut listener = cancel.subscribe();
        cancel.trigger();

        assert!(!DeadlineGuard::new(5).expire(Instant::now(), &mut listener).await);
    }
}
