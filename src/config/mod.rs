//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! flow preset (push-login / push-key / registration)
//!     → loader.rs (parse TOML, merge over preset)
//!     → validation.rs (semantic checks)
//!     → PollerConfig (validated, immutable)
//!     → borrowed by the poll session for its lifetime
//! ```
//!
//! # Design Decisions
//! - One parameterized poller; page variants are presets, not copies
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DeadlineConfig, EndpointConfig, FailureConfig, FlowVariant, ObservabilityConfig, PageConfig,
    PollerConfig, RetryConfig, StatusConfig,
};
