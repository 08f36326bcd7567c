//! Page boundary.
//!
//! # Data Flow
//! ```text
//! rendering layer (external)
//!     → Page (identifier input, countdown attributes)
//!     → poller / deadline read it
//!
//! poller / deadline conclude
//!     → PageActions (submit success form | navigate to failure destination)
//! ```
//!
//! # Design Decisions
//! - The poller never touches a DOM directly; hosts implement the traits
//! - Reads are pure; the only writes are countdown text and bar width
//! - `StaticPage` and `RecordingActions` serve headless hosts and tests

pub mod actions;
pub mod state;

pub use actions::{PageAction, PageActions, RecordingActions};
pub use state::{Page, StaticPage};
