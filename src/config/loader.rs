//! Configuration loading from disk.
//!
//! A config file names a `flow` preset and overrides any part of it; tables in
//! the file are merged key by key over the preset.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{FlowVariant, PollerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Preset error: {0}")]
    Preset(#[from] toml::ser::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PollerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<PollerConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;

    let flow = match overlay.get("flow") {
        Some(value) => value.clone().try_into::<FlowVariant>()?,
        None => FlowVariant::default(),
    };

    let mut merged = toml::Value::try_from(PollerConfig::for_flow(flow))?;
    merge(&mut merged, overlay);

    let config: PollerConfig = merged.try_into()?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
