//! Status poller for push-authentication and registration pages.
//!
//! A page shows a pending operation; the poller discovers when the remote
//! authority moves it to a terminal state and submits or navigates away,
//! racing a wall-clock deadline.

pub mod config;
pub mod deadline;
pub mod lifecycle;
pub mod observability;
pub mod page;
pub mod poller;

pub use config::PollerConfig;
pub use lifecycle::Cancellation;
pub use poller::{HttpStatusClient, PollSession, SessionReport};
