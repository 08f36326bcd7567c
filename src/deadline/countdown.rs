//! Countdown display.
//!
//! Observational only: it writes to the page and never influences the
//! session outcome.

use std::time::Duration;

use tokio::time::{interval_at, Instant};

use crate::config::PageConfig;
use crate::deadline::guard::MAX_TIMEOUT_SECS;
use crate::lifecycle::CancelListener;
use crate::page::Page;

/// Renders the remaining seconds and a proportional progress bar.
#[derive(Debug, Clone)]
pub struct Countdown {
    total_secs: u64,
    number_id: String,
    bar_id: String,
}

impl Countdown {
    pub fn new(total_secs: u64, page: &PageConfig) -> Self {
        Self {
            total_secs: total_secs.min(MAX_TIMEOUT_SECS),
            number_id: page.countdown_number.clone(),
            bar_id: page.countdown_bar.clone(),
        }
    }

    /// Tick once per second from `total` down to zero.
    ///
    /// On cancellation the display freezes, except that a session ending at
    /// or after the deadline instant still shows zero.
    pub async fn run<P: Page + ?Sized>(&self, page: &P, started: Instant, cancel: &mut CancelListener) {
        let deadline = started + Duration::from_secs(self.total_secs);
        let mut left = self.total_secs;
        self.render(page, left);

        let mut ticker = interval_at(started + Duration::from_secs(1), Duration::from_secs(1));
        while left > 0 {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    if Instant::now() >= deadline {
                        self.render(page, 0);
                    }
                    return;
                }
                _ = ticker.tick() => {
                    left -= 1;
                    self.render(page, left);
                }
            }
        }
    }

    fn render<P: Page + ?Sized>(&self, page: &P, left: u64) {
        page.set_text(&self.number_id, &left.to_string());
        page.set_width(&self.bar_id, &format!("{}%", progress_percent(left, self.total_secs)));
    }
}

/// Remaining fraction as a percentage.
pub fn progress_percent(left: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    left as f64 / total as f64 * 100.0
}
