//! Status poller subsystem.
//!
//! # Data Flow
//! ```text
//! Page (identifier input)
//!     → resolver.rs (absent → retry later)
//!     → client.rs (uncached GET on the status endpoint)
//!     → status.rs (payload → PollStatus | PollError)
//!     → cycle.rs (success | failure | retry after fixed delay)
//!     → session.rs (settle once, page action, cancel the deadline)
//! ```
//!
//! # Design Decisions
//! - Every error class ends in "keep polling" or "navigate away"; nothing is
//!   returned to the caller as an error
//! - Status sets and endpoints are configuration, not code

pub mod client;
pub mod cycle;
pub mod outcome;
pub mod resolver;
pub mod session;
pub mod status;

pub use client::{HttpStatusClient, StatusSource};
pub use cycle::{PollCycle, PollState, Resolution, RetryCause, Transition};
pub use outcome::{Conclusion, FailureReason, PollStats};
pub use resolver::IdentifierResolver;
pub use session::{PollSession, SessionReport};
pub use status::{CorrelationId, PollError, PollResult, PollStatus, StatusPayload};
