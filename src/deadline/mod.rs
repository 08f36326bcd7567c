//! Deadline subsystem.
//!
//! # Data Flow
//! ```text
//! page countdown container (data-redirect-seconds) or config fallback
//!     → guard.rs (one-shot timer, forces the failure path)
//!     → countdown.rs (optional once-per-second display)
//! ```
//!
//! # Design Decisions
//! - Both start at session start and share its start instant
//! - The guard races the poll cycle; it never waits for it
//! - The countdown has no effect on control flow

pub mod countdown;
pub mod guard;

pub use countdown::Countdown;
pub use guard::{DeadlineGuard, MAX_TIMEOUT_SECS};
