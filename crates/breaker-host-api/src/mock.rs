//! Mock notification scheduler for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::Notify;

use crate::{NotificationScheduler, NotifyError, NotifyResult, ReminderRequest};

/// A call received by [`MockScheduler`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerCall {
    RequestAuthorization,
    Schedule(Vec<ReminderRequest>),
    Clear,
}

/// Records calls instead of posting notifications
#[derive(Default)]
pub struct MockScheduler {
    calls: Mutex<Vec<SchedulerCall>>,
    pending: Mutex<Vec<ReminderRequest>>,
    called: Notify,

    /// Configure every call to fail
    pub fail: AtomicBool,

    /// Configure authorization to be denied
    pub deny_authorization: AtomicBool,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every call so far, oldest first (failed calls included)
    pub fn calls(&self) -> Vec<SchedulerCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests that would currently be pending on the device
    pub fn pending(&self) -> Vec<ReminderRequest> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Wait until at least `count` calls have been recorded
    pub async fn wait_for_calls(&self, count: usize) {
        loop {
            let notified = self.called.notified();
            if self.calls.lock().unwrap_or_else(PoisonError::into_inner).len() >= count {
                return;
            }
            notified.await;
        }
    }

    fn record(&self, call: SchedulerCall) -> NotifyResult<()> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        self.called.notify_waiters();

        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Internal("Mock scheduler failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationScheduler for MockScheduler {
    async fn request_authorization(&self) -> NotifyResult<bool> {
        self.record(SchedulerCall::RequestAuthorization)?;
        Ok(!self.deny_authorization.load(Ordering::SeqCst))
    }

    async fn schedule_daily_reminders(&self, requests: &[ReminderRequest]) -> NotifyResult<()> {
        self.record(SchedulerCall::Schedule(requests.to_vec()))?;
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = requests.to_vec();
        Ok(())
    }

    async fn clear_all_reminders(&self) -> NotifyResult<()> {
        self.record(SchedulerCall::Clear)?;
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}
