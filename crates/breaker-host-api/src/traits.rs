//! Notification scheduler trait

use async_trait::async_trait;
use breaker_util::TimeOfDay;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the platform notification center
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notifications not authorized")]
    NotAuthorized,

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;

/// One repeating local notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRequest {
    pub identifier: String,
    pub title: String,
    pub body: String,
    /// Fires at this wall-clock time
    pub time: TimeOfDay,
    pub repeats_daily: bool,
}

/// What the journal asks of the notification layer.
///
/// Sent fire-and-forget; the journal never learns whether it worked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderCommand {
    /// Ask the user for permission to post notifications
    RequestAuthorization,
    /// Replace all pending reminders with daily ones at these times
    Schedule(Vec<TimeOfDay>),
    /// Remove all pending reminders
    Clear,
}

/// Platform notification center - implemented by the host shell
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Prompt for permission. Returns whether notifications are allowed.
    async fn request_authorization(&self) -> NotifyResult<bool> {
        Ok(true)
    }

    /// Remove every pending request, then add `requests`
    async fn schedule_daily_reminders(&self, requests: &[ReminderRequest]) -> NotifyResult<()>;

    /// Remove every pending request
    async fn clear_all_reminders(&self) -> NotifyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_error_messages() {
        assert_eq!(
            NotifyError::NotAuthorized.to_string(),
            "Notifications not authorized"
        );
        assert_eq!(
            NotifyError::Rejected("quota".into()).to_string(),
            "Request rejected: quota"
        );
    }

    #[test]
    fn reminder_request_serialization() {
        let request = ReminderRequest {
            identifier: "daily-0".into(),
            title: "Check-in".into(),
            body: "body".into(),
            time: TimeOfDay::new(9, 15).unwrap(),
            repeats_daily: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["time"]["hour"], 9);
        assert_eq!(json["time"]["minute"], 15);

        let parsed: ReminderRequest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, request);
    }
}
