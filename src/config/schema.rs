//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the poller.
//! All types derive Serde traits for deserialization from config files.
//! Defaults reproduce the push-login flow; the other page variants are
//! available through [`PollerConfig::for_flow`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use url::Url;

/// Page variant the poller is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlowVariant {
    /// Push-authentication challenge shown during login.
    #[default]
    PushLogin,
    /// Older push page keyed by the authenticator key id.
    PushKey,
    /// Registration of a new authenticator device.
    Registration,
}

impl FlowVariant {
    /// Name used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowVariant::PushLogin => "push-login",
            FlowVariant::PushKey => "push-key",
            FlowVariant::Registration => "registration",
        }
    }
}

impl std::str::FromStr for FlowVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push-login" => Ok(FlowVariant::PushLogin),
            "push-key" => Ok(FlowVariant::PushKey),
            "registration" => Ok(FlowVariant::Registration),
            other => Err(format!("unknown flow '{}'", other)),
        }
    }
}

/// Root configuration for one poll session.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Preset this configuration was derived from.
    pub flow: FlowVariant,

    /// Where page state lives.
    pub page: PageConfig,

    /// Status endpoint template.
    pub endpoint: EndpointConfig,

    /// Terminal status sets.
    pub statuses: StatusConfig,

    /// Retry scheduling.
    pub retry: RetryConfig,

    /// Deadline guard settings.
    pub deadline: DeadlineConfig,

    /// Failure navigation.
    pub failure: FailureConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::for_flow(FlowVariant::PushLogin)
    }
}

impl PollerConfig {
    /// Build the preset configuration for a page variant.
    pub fn for_flow(flow: FlowVariant) -> Self {
        let mut config = Self {
            flow,
            page: PageConfig::default(),
            endpoint: EndpointConfig::default(),
            statuses: StatusConfig::default(),
            retry: RetryConfig::default(),
            deadline: DeadlineConfig::default(),
            failure: FailureConfig::default(),
            observability: ObservabilityConfig::default(),
        };

        match flow {
            FlowVariant::PushLogin => {}
            FlowVariant::PushKey => {
                config.page.identifier_field = "pushAuthKeyId".to_string();
                config.endpoint.path = "/cas/inalogy/check".to_string();
                config.endpoint.id_param = "keyId".to_string();
                config.retry.delay_ms = 3000;
                config.deadline.enabled = false;
                config.deadline.countdown = false;
                config
                    .failure
                    .reason_flags
                    .insert("REJECTED".to_string(), "pushFailed".to_string());
                config
                    .failure
                    .reason_flags
                    .insert("EXPIRED".to_string(), "pushTimeout".to_string());
            }
            FlowVariant::Registration => {
                config.page.identifier_field = "regRequestId".to_string();
                config.page.success_form = "registration-form".to_string();
                config.endpoint.path = "/cas/inalogy/check/registration".to_string();
                config.endpoint.id_param = "requestId".to_string();
                config.statuses.success = "REGISTERED".to_string();
            }
        }

        config
    }

    /// Fixed delay between poll attempts.
    pub fn retry_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.retry.delay_ms)
    }
}

/// Names of the page elements the poller reads and writes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    /// Input field holding the correlation identifier.
    pub identifier_field: String,

    /// Form submitted when the operation succeeds.
    pub success_form: String,

    /// Element carrying the timeout attribute.
    pub countdown_container: String,

    /// Data attribute holding the timeout in seconds.
    pub redirect_seconds_attribute: String,

    /// Element showing the remaining seconds.
    pub countdown_number: String,

    /// Element whose width tracks the remaining fraction.
    pub countdown_bar: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            identifier_field: "pushAuthPushId".to_string(),
            success_form: "push-approve-form".to_string(),
            countdown_container: "countdown".to_string(),
            redirect_seconds_attribute: "redirect-seconds".to_string(),
            countdown_number: "countdown-number".to_string(),
            countdown_bar: "countdown-bar".to_string(),
        }
    }
}

/// Status endpoint template: `{base_url}{path}?{id_param}=<identifier>`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Origin of the authority (e.g., "http://localhost:8080").
    pub base_url: String,

    /// Check path on the authority.
    pub path: String,

    /// Query parameter carrying the identifier.
    pub id_param: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            path: "/cas/inalogy/check/login".to_string(),
            id_param: "pushId".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl EndpointConfig {
    /// Expand the template for one identifier.
    pub fn status_url(&self, identifier: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.base_url)?.join(&self.path)?;
        url.query_pairs_mut().append_pair(&self.id_param, identifier);
        Ok(url)
    }
}

/// Which status values end polling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Status that triggers the success form.
    pub success: String,

    /// Statuses that navigate to the failure destination.
    pub terminal_failures: BTreeSet<String>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            success: "APPROVED".to_string(),
            terminal_failures: ["REJECTED", "EXPIRED"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Delay before the next attempt in milliseconds.
    pub delay_ms: u64,

    /// Give up after this many consecutive transport failures.
    /// Unset means failures are retried like pending responses, forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_consecutive_failures: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2200,
            max_consecutive_failures: None,
        }
    }
}

/// Deadline guard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeadlineConfig {
    /// Start the deadline guard.
    pub enabled: bool,

    /// Timeout used when the page carries no usable value.
    pub timeout_secs: u64,

    /// Drive the countdown display.
    pub countdown: bool,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 45,
            countdown: true,
        }
    }
}

/// Failure navigation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FailureConfig {
    /// Landing location after a failed or timed-out wait.
    pub destination: String,

    /// Reason code → query flag appended as `<flag>=true`.
    pub reason_flags: BTreeMap<String, String>,
}

impl Default for FailureConfig {
    fn default() -> Self {
        Self {
            destination: "/cas/login".to_string(),
            reason_flags: BTreeMap::new(),
        }
    }
}

impl FailureConfig {
    /// Destination for a given failure reason code.
    pub fn destination_for(&self, reason_code: &str) -> String {
        match self.reason_flags.get(reason_code) {
            Some(flag) => {
                let separator = if self.destination.contains('?') { '&' } else { '?' };
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair(flag, "true")
                    .finish();
                format!("{}{}{}", self.destination, separator, query)
            }
            None => self.destination.clone(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the pretty format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
