//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the endpoint template expands to an absolute URL
//! - Validate value ranges (delays and timeouts > 0)
//! - Detect conflicting status sets
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PollerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::PollerConfig;
use crate::deadline::MAX_TIMEOUT_SECS;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &PollerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.endpoint.base_url) {
        Ok(url) if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::new("endpoint.base_url", "must be an absolute http(s) URL"));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("endpoint.base_url", e.to_string())),
    }
    if !config.endpoint.path.starts_with('/') {
        errors.push(ValidationError::new("endpoint.path", "must start with '/'"));
    }
    if config.endpoint.id_param.is_empty() {
        errors.push(ValidationError::new("endpoint.id_param", "must not be empty"));
    }
    if config.endpoint.request_timeout_secs == 0 {
        errors.push(ValidationError::new("endpoint.request_timeout_secs", "must be greater than 0"));
    }

    if config.page.identifier_field.is_empty() {
        errors.push(ValidationError::new("page.identifier_field", "must not be empty"));
    }
    if config.page.success_form.is_empty() {
        errors.push(ValidationError::new("page.success_form", "must not be empty"));
    }

    if config.statuses.success.is_empty() {
        errors.push(ValidationError::new("statuses.success", "must not be empty"));
    }
    if config.statuses.terminal_failures.contains(&config.statuses.success) {
        errors.push(ValidationError::new(
            "statuses.terminal_failures",
            format!("contains the success status '{}'", config.statuses.success),
        ));
    }

    if config.retry.delay_ms == 0 {
        errors.push(ValidationError::new("retry.delay_ms", "must be greater than 0"));
    }
    if config.retry.max_consecutive_failures == Some(0) {
        errors.push(ValidationError::new("retry.max_consecutive_failures", "must be greater than 0 when set"));
    }

    if config.deadline.timeout_secs == 0 {
        errors.push(ValidationError::new("deadline.timeout_secs", "must be greater than 0"));
    } else if config.deadline.timeout_secs > MAX_TIMEOUT_SECS {
        errors.push(ValidationError::new(
            "deadline.timeout_secs",
            format!("must be at most {}", MAX_TIMEOUT_SECS),
        ));
    }

    if config.failure.destination.is_empty() {
        errors.push(ValidationError::new("failure.destination", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
