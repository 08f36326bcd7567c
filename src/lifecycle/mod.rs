//! Session lifecycle management.
//!
//! # Data Flow
//! ```text
//! Session start:
//!     Poll cycle, deadline guard and countdown subscribe to one Cancellation
//!
//! First terminal outcome (cancel.rs, settlement.rs):
//!     Settlement accepts it → terminal page action → Cancellation triggered
//!     → every other part stops at its next suspension point
//! ```
//!
//! # Design Decisions
//! - Exactly one terminal action per session, whoever gets there first
//! - Losers are cancelled explicitly instead of relying on page unload
//! - Cancellation also drops an in-flight status query

pub mod cancel;
pub mod settlement;

pub use cancel::{CancelListener, Cancellation};
pub use settlement::Settlement;
