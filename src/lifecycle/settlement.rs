//! Settle-once latch for the session outcome.

use std::sync::OnceLock;

/// Holds the first value offered to it and rejects every later one.
///
/// Whoever wins [`Settlement::settle`] owns the terminal side effect; losers
/// must do nothing.
#[derive(Debug)]
pub struct Settlement<T> {
    outcome: OnceLock<T>,
}

impl<T> Settlement<T> {
    pub fn new() -> Self {
        Self {
            outcome: OnceLock::new(),
        }
    }

    /// Offer an outcome. Returns `true` if this call settled the latch.
    pub fn settle(&self, outcome: T) -> bool {
        self.outcome.set(outcome).is_ok()
    }

    /// The settled outcome, if any.
    pub fn get(&self) -> Option<&T> {
        self.outcome.get()
    }

    pub fn into_inner(self) -> Option<T> {
        self.outcome.into_inner()
    }
}

impl<T> Default for Settlement<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_settler_wins() {
        let settlement = Settlement::new();
        assert!(settlement.get().is_none());
        assert!(settlement.settle("deadline"));
        assert!(!settlement.settle("approved"));
        assert_eq!(settlement.get(), Some(&"deadline"));
        assert_eq!(settlement.into_inner(), Some("deadline"));
    }
}
