//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! poller, deadline, session produce:
//!     → logging.rs (structured log events, one span per session)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so stdout stays free for the session report
//! - Session ID (UUID v4) flows through every event of a session

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
