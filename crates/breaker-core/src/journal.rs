//! The journal store
//!
//! `JournalStore` owns the one `AppState` of the device. Every change goes
//! through a `&mut self` method here, which applies it synchronously and
//! then publishes a fresh snapshot on a `watch` channel. The persist writer
//! and the presentation layer both read from that channel.

use breaker_api::{AppState, BuddyContact, CheckIn, HabitConfig, IfThenRule, RelapseEvent, UserUrge};
use breaker_host_api::{ReminderCommand, ReminderSender};
use breaker_util::{
    BreakerError, BuddyId, CheckInId, RelapseId, Result, RuleId, TimeOfDay, UrgeId,
    format_datetime_full,
};
use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Allowed check-in mood values
pub const MOOD_RANGE: RangeInclusive<u8> = 1..=5;

/// Allowed check-in craving values
pub const CRAVING_RANGE: RangeInclusive<u8> = 0..=10;

/// Single writer over the journal document
pub struct JournalStore {
    state: AppState,
    snapshots: watch::Sender<Arc<AppState>>,
    reminders: Option<ReminderSender>,
}

impl JournalStore {
    /// Take ownership of a loaded document.
    ///
    /// The returned receiver sees every snapshot published from now on;
    /// hand it to the persist writer. A document without an install anchor
    /// gets one at `now`, which is published right away.
    pub fn new(initial: AppState, now: DateTime<Local>) -> (Self, watch::Receiver<Arc<AppState>>) {
        let (tx, rx) = watch::channel(Arc::new(initial.clone()));
        let mut journal = Self {
            state: initial,
            snapshots: tx,
            reminders: None,
        };

        if journal.state.installed_at.is_none() {
            journal.state.installed_at = Some(now);
            info!(installed_at = %format_datetime_full(&now), "Install anchor recorded");
            journal.publish();
        }

        (journal, rx)
    }

    /// Forward reminder changes to a dispatcher
    pub fn with_reminders(mut self, reminders: ReminderSender) -> Self {
        self.reminders = Some(reminders);
        self
    }

    /// Current document
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Latest published snapshot, cheap to clone and hold
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Observe future snapshots
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.snapshots.subscribe()
    }

    fn publish(&self) {
        self.snapshots.send_replace(Arc::new(self.state.clone()));
    }

    fn send_reminder(&self, command: ReminderCommand) {
        let Some(reminders) = &self.reminders else {
            debug!(?command, "No reminder dispatcher attached");
            return;
        };
        if reminders.send(command).is_err() {
            warn!("Reminder dispatcher gone, command dropped");
        }
    }

    /// Ask the platform for notification permission
    pub fn request_notification_permission(&self) {
        self.send_reminder(ReminderCommand::RequestAuthorization);
    }

    pub fn complete_onboarding(&mut self, habit: HabitConfig) {
        info!(habit = habit.display_name(), "Onboarding completed");
        self.state.habit = habit;
        self.state.has_onboarded = true;
        self.publish();
    }

    /// Append a relapse at `now`. Blank trigger or notes are stored as absent.
    pub fn log_relapse(
        &mut self,
        trigger: Option<String>,
        notes: Option<String>,
        now: DateTime<Local>,
    ) -> RelapseId {
        let event = RelapseEvent {
            id: RelapseId::new(),
            date: now,
            trigger: non_blank(trigger),
            notes: non_blank(notes),
        };
        let id = event.id;

        debug!(relapse_id = %id, trigger = ?event.trigger, "Relapse logged");
        self.state.relapse_log.push(event);
        self.publish();
        id
    }

    pub fn log_success(&mut self) {
        self.state.successful_urges += 1;
        debug!(successful_urges = self.state.successful_urges, "Urge survived");
        self.publish();
    }

    /// Store the reminder preference, then ask the dispatcher to schedule
    /// or clear. Dispatch is fire-and-forget; the stored preference stands
    /// whatever the platform does with it.
    pub fn set_reminders(&mut self, enabled: bool, times: Vec<TimeOfDay>) {
        self.state.daily_reminders_enabled = enabled;
        self.state.reminder_times = times;
        debug!(enabled, count = self.state.reminder_times.len(), "Reminders updated");
        self.publish();

        let command = if enabled {
            ReminderCommand::Schedule(self.state.reminder_times.clone())
        } else {
            ReminderCommand::Clear
        };
        self.send_reminder(command);
    }

    pub fn add_if_then(&mut self, cue: impl Into<String>, action: impl Into<String>) -> RuleId {
        let rule = IfThenRule {
            id: RuleId::new(),
            cue: cue.into(),
            action: action.into(),
            is_active: true,
        };
        let id = rule.id;

        debug!(rule_id = %id, "If-then rule added");
        self.state.if_then_rules.push(rule);
        self.publish();
        id
    }

    /// Flip a rule's active flag. Returns false for an unknown id.
    pub fn toggle_if_then(&mut self, id: &RuleId) -> bool {
        let Some(rule) = self.state.if_then_rules.iter_mut().find(|r| &r.id == id) else {
            return false;
        };
        rule.is_active = !rule.is_active;

        debug!(rule_id = %id, active = rule.is_active, "If-then rule toggled");
        self.publish();
        true
    }

    pub fn remove_if_then(&mut self, id: &RuleId) -> bool {
        let before = self.state.if_then_rules.len();
        self.state.if_then_rules.retain(|r| &r.id != id);
        self.changed_if(before != self.state.if_then_rules.len())
    }

    pub fn add_buddy(&mut self, name: impl Into<String>, phone: impl Into<String>) -> BuddyId {
        let buddy = BuddyContact {
            id: BuddyId::new(),
            name: name.into(),
            phone: phone.into(),
        };
        let id = buddy.id;

        debug!(buddy_id = %id, "Buddy added");
        self.state.buddies.push(buddy);
        self.publish();
        id
    }

    pub fn remove_buddy(&mut self, id: &BuddyId) -> bool {
        let before = self.state.buddies.len();
        self.state.buddies.retain(|b| &b.id != id);
        self.changed_if(before != self.state.buddies.len())
    }

    /// Record a daily check-in.
    ///
    /// Mood outside 1..=5 or craving outside 0..=10 is rejected and nothing
    /// is stored.
    pub fn log_check_in(
        &mut self,
        mood: u8,
        craving: u8,
        halt: BTreeSet<String>,
        notes: Option<String>,
        now: DateTime<Local>,
    ) -> Result<CheckInId> {
        if !MOOD_RANGE.contains(&mood) {
            return Err(BreakerError::validation(format!(
                "mood must be between {} and {}, got {}",
                MOOD_RANGE.start(),
                MOOD_RANGE.end(),
                mood
            )));
        }
        if !CRAVING_RANGE.contains(&craving) {
            return Err(BreakerError::validation(format!(
                "craving must be between {} and {}, got {}",
                CRAVING_RANGE.start(),
                CRAVING_RANGE.end(),
                craving
            )));
        }

        let check_in = CheckIn {
            id: CheckInId::new(),
            date: now,
            mood,
            craving,
            halt,
            notes: non_blank(notes),
        };
        let id = check_in.id;

        debug!(check_in_id = %id, mood, craving, "Check-in logged");
        self.state.check_ins.push(check_in);
        self.publish();
        Ok(id)
    }

    /// Store a trimmed address, or clear it when blank
    pub fn set_home_address(&mut self, address: Option<String>) {
        self.state.home_address = address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        debug!(is_set = self.state.home_address.is_some(), "Home address updated");
        self.publish();
    }

    /// Whole document as pretty-printed JSON
    pub fn export_snapshot(&self) -> Result<String> {
        breaker_store::render_export(&self.state)
            .map_err(|e| BreakerError::serialization(e.to_string()))
    }

    pub fn add_urge(&mut self, urge: UserUrge) {
        debug!(urge_id = %urge.id, kind = ?urge.kind, "Urge added");
        self.state.my_urges.push(urge);
        self.publish();
    }

    /// Replace the urge with the same id. Returns false if there is none.
    pub fn update_urge(&mut self, urge: UserUrge) -> bool {
        let Some(slot) = self.state.my_urges.iter_mut().find(|u| u.id == urge.id) else {
            return false;
        };
        *slot = urge;
        self.publish();
        true
    }

    pub fn remove_urge(&mut self, id: &UrgeId) -> bool {
        let before = self.state.my_urges.len();
        self.state.my_urges.retain(|u| &u.id != id);
        self.changed_if(before != self.state.my_urges.len())
    }

    /// Reset one urge's own streak. The global relapse log is not touched.
    pub fn log_urge_relapse(&mut self, id: &UrgeId, now: DateTime<Local>) -> bool {
        let Some(urge) = self.state.my_urges.iter_mut().find(|u| &u.id == id) else {
            return false;
        };
        urge.last_relapse_date = Some(now);
        urge.current_streak = 0;

        debug!(urge_id = %id, "Urge relapse logged");
        self.publish();
        true
    }

    /// Keep the best score. Returns true if `score` is a new high.
    pub fn submit_game_score(&mut self, score: u32) -> bool {
        if score <= self.state.game_high_score {
            return false;
        }
        self.state.game_high_score = score;
        info!(score, "New game high score");
        self.publish();
        true
    }

    pub fn record_sos_feedback(&mut self, helped: bool) {
        let feedback = &mut self.state.sos_feedback;
        if helped {
            feedback.helped_count += 1;
        } else {
            feedback.still_urge_count += 1;
        }
        debug!(helped, "SOS feedback recorded");
        self.publish();
    }

    fn changed_if(&self, changed: bool) -> bool {
        if changed {
            self.publish();
        }
        changed
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
