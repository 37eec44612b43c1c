//! Core journal and urge-session logic for breaker
//!
//! This crate is the heart of breaker, containing:
//! - The journal store (single writer over the `AppState` document)
//! - Streak and relapse-risk calculation
//! - Urge session countdown (Idle -> Running -> Paused / Expired)
//! - The 1 Hz ticker driving sessions and flow countdowns
//! - Guided and session urge flows
//! - Derived trend series for insights

mod events;
mod flow;
mod insights;
mod journal;
mod session;
mod streak;
mod ticker;

pub use events::*;
pub use flow::*;
pub use insights::*;
pub use journal::*;
pub use session::*;
pub use streak::*;
pub use ticker::*;
