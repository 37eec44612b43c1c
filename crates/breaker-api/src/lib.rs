//! Shared types for breaker
//!
//! This crate defines the types exchanged between the core and the
//! presentation shell:
//! - The journal document (`AppState` and its records)
//! - Urge session state published by the ticker
//! - Guided-flow vocabulary (activities, outcomes)

mod model;
mod session;

pub use model::*;
pub use session::*;

/// Default panic plan shown until the user writes their own
pub const DEFAULT_PANIC_PLAN: &str = "Step outside + cold water + text accountability buddy.";
