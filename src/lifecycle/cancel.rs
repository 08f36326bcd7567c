//! Cancellation shared by the racing parts of a poll session.

use tokio::sync::watch;

/// Coordinator for session cancellation.
///
/// Every long-running part of a session subscribes before it starts; the
/// first part to settle the session triggers it and the others stop at their
/// next suspension point. Late subscribers still observe an earlier trigger.
#[derive(Debug)]
pub struct Cancellation {
    tx: watch::Sender<bool>,
}

impl Cancellation {
    /// Create a new, untriggered coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Subscribe to the cancellation signal.
    pub fn subscribe(&self) -> CancelListener {
        CancelListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the cancellation signal.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the signal has been triggered.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a [`Cancellation`].
#[derive(Debug, Clone)]
pub struct CancelListener {
    rx: watch::Receiver<bool>,
}

impl CancelListener {
    /// Whether cancellation has been triggered.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is triggered.
    ///
    /// Never resolves if the coordinator is dropped untriggered.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_listener() {
        let cancel = Cancellation::new();
        let mut listener = cancel.subscribe();
        assert!(!listener.is_cancelled());

        let waiter = tokio::spawn(async move {
            listener.cancelled().await;
            true
        });
        cancel.trigger();

        let woke = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(woke);
        assert!(cancel.is_triggered());
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_trigger() {
        let cancel = Cancellation::new();
        cancel.trigger();

        let mut listener = cancel.subscribe();
        assert!(listener.is_cancelled());
        tokio::time::timeout(Duration::from_millis(100), listener.cancelled())
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_coordinator_never_cancels() {
        let cancel = Cancellation::new();
        let mut listener = cancel.subscribe();
        drop(cancel);

        let waited = tokio::time::timeout(Duration::from_secs(5), listener.cancelled()).await;
        assert!(waited.is_err());
    }
}
