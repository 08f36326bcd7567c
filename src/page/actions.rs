//! Terminal page actions.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

/// Side effects the poller performs when a session concludes.
pub trait PageActions {
    /// Submit the form with the given id.
    fn submit_form(&self, form_id: &str);

    /// Leave the page for the given location.
    fn navigate(&self, location: &str);
}

/// A performed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum PageAction {
    Submit(String),
    Navigate(String),
}

/// Logs and records every action instead of performing it.
#[derive(Debug, Default)]
pub struct RecordingActions {
    performed: Mutex<Vec<PageAction>>,
}

impl RecordingActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions in the order they were performed.
    pub fn performed(&self) -> Vec<PageAction> {
        self.performed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Form ids submitted so far.
    pub fn submissions(&self) -> Vec<String> {
        self.performed()
            .into_iter()
            .filter_map(|a| match a {
                PageAction::Submit(form) => Some(form),
                PageAction::Navigate(_) => None,
            })
            .collect()
    }

    /// Locations navigated to so far.
    pub fn navigations(&self) -> Vec<String> {
        self.performed()
            .into_iter()
            .filter_map(|a| match a {
                PageAction::Navigate(location) => Some(location),
                PageAction::Submit(_) => None,
            })
            .collect()
    }

    fn record(&self, action: PageAction) {
        self.performed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(action);
    }
}

impl PageActions for RecordingActions {
    fn submit_form(&self, form_id: &str) {
        tracing::info!(form = %form_id, "Submitting success form");
        self.record(PageAction::Submit(form_id.to_string()));
    }

    fn navigate(&self, location: &str) {
        tracing::info!(location = %location, "Navigating away");
        self.record(PageAction::Navigate(location.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let actions = RecordingActions::new();
        actions.navigate("/cas/login");
        actions.submit_form("push-approve-form");

        assert_eq!(
            actions.performed(),
            vec![
                PageAction::Navigate("/cas/login".into()),
                PageAction::Submit("push-approve-form".into()),
            ]
        );
        assert_eq!(actions.submissions(), vec!["push-approve-form".to_string()]);
        assert_eq!(actions.navigations(), vec!["/cas/login".to_string()]);
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_value(PageAction::Navigate("/cas/login".into())).unwrap();
        assert_eq!(json, serde_json::json!({"action": "navigate", "target": "/cas/login"}));
    }
}
