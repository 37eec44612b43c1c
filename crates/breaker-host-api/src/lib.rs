//! Notification interface for breaker
//!
//! The host shell owns the platform notification center. This crate
//! defines what the core asks of it and the task that forwards reminder
//! changes to it. It contains no platform code itself.

mod dispatcher;
mod mock;
mod reminders;
mod traits;

pub use dispatcher::*;
pub use mock::*;
pub use reminders::*;
pub use traits::*;
