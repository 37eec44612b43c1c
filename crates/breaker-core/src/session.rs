//! Urge session countdown
//!
//! A plain state machine driven by `tick()` once per second. It does not
//! own a timer; see `SessionTicker` for the task that drives it. While the
//! app is suspended no ticks arrive, so the shell reports background and
//! foreground transitions and the session catches up from the wall clock.

use breaker_api::{SessionSnapshot, SessionState};
use breaker_util::format_countdown;
use chrono::{DateTime, Local};
use tracing::{debug, info};

/// Default countdown length in seconds
pub const DEFAULT_SESSION_SECS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BackgroundStamp {
    at: DateTime<Local>,
    remaining: u32,
}

/// Countdown for riding out an urge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrgeSession {
    duration: u32,
    remaining: u32,
    state: SessionState,
    background: Option<BackgroundStamp>,
}

impl UrgeSession {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration: duration_secs,
            remaining: duration_secs,
            state: SessionState::Idle,
            background: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Start or resume. A finished countdown starts over from full.
    pub fn start(&mut self) {
        if self.remaining == 0 {
            self.remaining = self.duration;
        }
        self.state = SessionState::Running;
        debug!(remaining = self.remaining, "Urge session running");
    }

    /// Count down one second. Ignored unless running.
    pub fn tick(&mut self) -> SessionState {
        if self.state != SessionState::Running {
            return self.state;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expire();
        }
        self.state
    }

    pub fn pause(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Paused;
            debug!(remaining = self.remaining, "Urge session paused");
        }
    }

    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.remaining = self.duration;
        self.background = None;
    }

    /// The app is being suspended
    pub fn went_background(&mut self, now: DateTime<Local>) {
        self.background = Some(BackgroundStamp {
            at: now,
            remaining: self.remaining,
        });
    }

    /// The app is back in the foreground.
    ///
    /// Time spent away is subtracted from what was left when the app went
    /// to the background. Ticks that did fire in the meantime are not
    /// counted twice.
    pub fn became_active(&mut self, now: DateTime<Local>) {
        let Some(stamp) = self.background.take() else {
            return;
        };
        if self.state != SessionState::Running {
            return;
        }

        let elapsed = (now - stamp.at).num_seconds().max(0);
        let caught_up = (stamp.remaining as i64 - elapsed).max(0) as u32;
        self.remaining = self.remaining.min(caught_up);

        debug!(elapsed, remaining = self.remaining, "Urge session caught up");
        if self.remaining == 0 {
            self.expire();
        }
    }

    /// 0.0 at start, 1.0 when expired
    pub fn progress(&self) -> f64 {
        self.snapshot().progress()
    }

    /// Remaining time as `MM:SS`
    pub fn format_countdown(&self) -> String {
        format_countdown(self.remaining)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            duration_secs: self.duration,
            remaining_secs: self.remaining,
        }
    }

    fn expire(&mut self) {
        self.state = SessionState::Expired;
        self.background = None;
        info!(duration = self.duration, "Urge session expired");
    }
}

impl Default for UrgeSession {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_ticks_past_zero_expire() {
        let mut session = UrgeSession::default();
        session.start();

        for _ in 0..605 {
            session.tick();
        }

        assert_eq!(session.state(), SessionState::Expired);
        assert_eq!(session.remaining(), 0);
        assert_eq!(session.progress(), 1.0);
    }

    #[test]
    fn test_tick_ignored_when_not_running() {
        let mut session = UrgeSession::new(60);
        assert_eq!(session.tick(), SessionState::Idle);
        assert_eq!(session.remaining(), 60);

        session.start();
        session.tick();
        session.pause();
        assert_eq!(session.tick(), SessionState::Paused);
        assert_eq!(session.remaining(), 59);
    }

    #[test]
    fn test_pause_only_from_running() {
        let mut session = UrgeSession::new(60);
        session.pause();
        assert_eq!(session.state(), SessionState::Idle);

        session.start();
        session.pause();
        assert_eq!(session.state(), SessionState::Paused);

        session.start();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.remaining(), 60);
    }

    #[test]
    fn test_restart_after_expiry_refills() {
        let mut session = UrgeSession::new(2);
        session.start();
        session.tick();
        session.tick();
        assert_eq!(session.state(), SessionState::Expired);

        session.start();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.remaining(), 2);
    }

    #[test]
    fn test_reset() {
        let mut session = UrgeSession::new(30);
        session.start();
        session.tick();
        session.reset();

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.remaining(), 30);
    }

    #[test]
    fn test_long_background_expires() {
        let mut session = UrgeSession::default();
        session.start();
        session.went_background(noon());
        session.became_active(noon() + Duration::seconds(650));

        assert_eq!(session.remaining(), 0);
        assert_eq!(session.state(), SessionState::Expired);
    }

    #[test]
    fn test_short_background_subtracts() {
        let mut session = UrgeSession::default();
        session.start();
        session.went_background(noon());
        session.became_active(noon() + Duration::seconds(90));

        assert_eq!(session.remaining(), 510);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_background_does_not_double_count_ticks() {
        let mut session = UrgeSession::default();
        session.start();
        session.went_background(noon());
        // Some ticks still fired before suspension took hold
        for _ in 0..10 {
            session.tick();
        }
        session.became_active(noon() + Duration::seconds(30));

        assert_eq!(session.remaining(), 570);
    }

    #[test]
    fn test_background_while_paused_changes_nothing() {
        let mut session = UrgeSession::default();
        session.start();
        session.pause();
        session.went_background(noon());
        session.became_active(noon() + Duration::seconds(900));

        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.remaining(), 600);

        // The stamp was consumed
        session.start();
        session.became_active(noon() + Duration::seconds(1200));
        assert_eq!(session.remaining(), 600);
    }

    #[test]
    fn test_countdown_format() {
        let mut session = UrgeSession::new(125);
        assert_eq!(session.format_countdown(), "02:05");
        session.start();
        session.tick();
        assert_eq!(session.format_countdown(), "02:04");
    }
}
