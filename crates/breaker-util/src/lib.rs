//! Shared utilities for breaker
//!
//! This crate provides:
//! - ID types (RelapseId, RuleId, BuddyId, CheckInId, UrgeId)
//! - Time utilities (mockable wall clock, calendar-day math, time of day)
//! - Error types
//! - Default paths for the journal document and exports

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
