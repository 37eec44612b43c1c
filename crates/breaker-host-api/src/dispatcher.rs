//! Reminder dispatch task
//!
//! The journal sends `ReminderCommand`s over an unbounded channel and moves
//! on. This task forwards them to the scheduler one at a time, in order.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{NotificationScheduler, ReminderCommand, build_reminder_requests};

/// Sending half handed to the journal
pub type ReminderSender = mpsc::UnboundedSender<ReminderCommand>;

/// Forwards reminder commands to a [`NotificationScheduler`]
pub struct ReminderDispatcher {
    scheduler: Arc<dyn NotificationScheduler>,
    commands: mpsc::UnboundedReceiver<ReminderCommand>,
}

impl ReminderDispatcher {
    /// Create a dispatcher together with the sender that feeds it
    pub fn new(scheduler: Arc<dyn NotificationScheduler>) -> (ReminderSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            tx,
            Self {
                scheduler,
                commands: rx,
            },
        )
    }

    /// Run on the current tokio runtime until every sender is dropped
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        debug!("Reminder dispatcher started");

        while let Some(command) = self.commands.recv().await {
            self.dispatch(command).await;
        }

        info!("Reminder dispatcher stopped");
    }

    async fn dispatch(&self, command: ReminderCommand) {
        match command {
            ReminderCommand::RequestAuthorization => {
                match self.scheduler.request_authorization().await {
                    Ok(true) => info!("Notifications authorized"),
                    Ok(false) => info!("Notifications denied by user"),
                    Err(e) => warn!(error = %e, "Notification authorization failed"),
                }
            }
            ReminderCommand::Schedule(times) => {
                let requests = build_reminder_requests(&times);
                match self.scheduler.schedule_daily_reminders(&requests).await {
                    Ok(()) => info!(count = requests.len(), "Daily reminders scheduled"),
                    Err(e) => warn!(error = %e, count = requests.len(), "Failed to schedule reminders"),
                }
            }
            ReminderCommand::Clear => match self.scheduler.clear_all_reminders().await {
                Ok(()) => info!("Daily reminders cleared"),
                Err(e) => warn!(error = %e, "Failed to clear reminders"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockScheduler, SchedulerCall};
    use breaker_util::TimeOfDay;

    #[tokio::test]
    async fn test_commands_forwarded_in_order() {
        let scheduler = Arc::new(MockScheduler::new());
        let (tx, dispatcher) = ReminderDispatcher::new(scheduler.clone());
        let handle = dispatcher.spawn();

        let times = vec![TimeOfDay::new(9, 0).unwrap(), TimeOfDay::new(20, 0).unwrap()];
        tx.send(ReminderCommand::RequestAuthorization).unwrap();
        tx.send(ReminderCommand::Schedule(times.clone())).unwrap();
        tx.send(ReminderCommand::Clear).unwrap();
        drop(tx);
        handle.await.unwrap();

        let calls = scheduler.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], SchedulerCall::RequestAuthorization);
        assert_eq!(calls[1], SchedulerCall::Schedule(build_reminder_requests(&times)));
        assert_eq!(calls[2], SchedulerCall::Clear);
        assert!(scheduler.pending().is_empty());
    }

    #[tokio::test]
    async fn test_commands_applied_while_sender_alive() {
        let scheduler = Arc::new(MockScheduler::new());
        let (tx, dispatcher) = ReminderDispatcher::new(scheduler.clone());
        let handle = dispatcher.spawn();

        let times = vec![TimeOfDay::new(7, 30).unwrap()];
        tx.send(ReminderCommand::Schedule(times.clone())).unwrap();
        scheduler.wait_for_calls(1).await;

        assert_eq!(scheduler.pending(), build_reminder_requests(&times));
        assert!(!handle.is_finished());

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_dispatcher() {
        let scheduler = Arc::new(MockScheduler::new());
        scheduler.set_fail(true);

        let (tx, dispatcher) = ReminderDispatcher::new(scheduler.clone());
        let handle = dispatcher.spawn();

        tx.send(ReminderCommand::Clear).unwrap();
        tx.send(ReminderCommand::Schedule(vec![TimeOfDay::new(8, 0).unwrap()]))
            .unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(scheduler.calls().len(), 2);
    }
}
