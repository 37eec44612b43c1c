//! Guided urge flows
//!
//! Two variants walk the user through an urge:
//!
//! ```text
//! Guided:  Delay -> Breathe -> CopingTask -> LogOutcome -> Finished
//! Session: Countdown -> LogOutcome -> Feedback -> Finished
//! ```
//!
//! The flow owns the countdown session used by `Delay` and `Countdown`.
//! Nothing is written to the journal before `LogOutcome`, so abandoning a
//! flow half-way leaves no trace.

use breaker_api::{Outcome, SessionState, UrgeActivity};
use breaker_util::{BreakerError, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{FlowEvent, JournalStore, UrgeSession};

/// Suggestions rotated through on the coping-task step
pub const COPING_TASKS: [&str; 10] = [
    "Drink a full glass of cold water.",
    "Go outside for 3 minutes. Look far away.",
    "Text your accountability buddy: “Having an urge—say something encouraging.”",
    "10 push-ups or 20 bodyweight squats.",
    "Put phone in another room for 10 minutes.",
    "Box breathing: 4 in, 4 hold, 4 out, 4 hold (2 minutes).",
    "Write one sentence: Why do I want to quit?",
    "Chew gum or brush teeth.",
    "Open notes: list 3 triggers you noticed today.",
    "Take a brisk 2-minute walk.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Guided,
    Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    Delay,
    Breathe,
    CopingTask,
    Countdown,
    LogOutcome,
    Feedback,
    Finished,
}

/// 4-7-8 breathing script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    pub fn label(&self) -> &'static str {
        match self {
            BreathPhase::Inhale => "Inhale",
            BreathPhase::Hold => "Hold",
            BreathPhase::Exhale => "Exhale",
        }
    }

    /// How long the phase lasts
    pub fn secs(&self) -> u32 {
        match self {
            BreathPhase::Inhale => 4,
            BreathPhase::Hold => 7,
            BreathPhase::Exhale => 8,
        }
    }

    pub fn next(&self) -> Option<BreathPhase> {
        match self {
            BreathPhase::Inhale => Some(BreathPhase::Hold),
            BreathPhase::Hold => Some(BreathPhase::Exhale),
            BreathPhase::Exhale => None,
        }
    }
}

/// Input from the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "activity", rename_all = "snake_case")]
pub enum FlowSignal {
    /// The countdown ran out
    TimerExpired,
    /// Leave the countdown early
    Skip,
    /// Next breathing phase, or coping task done
    Confirm,
    PickActivity(UrgeActivity),
    /// Show another coping task
    NewIdea,
}

/// One walk through an urge
#[derive(Debug, Clone)]
pub struct UrgeFlow {
    kind: FlowKind,
    step: FlowStep,
    timer: UrgeSession,
    breath: BreathPhase,
    task_index: usize,
    activity: Option<UrgeActivity>,
}

impl UrgeFlow {
    pub fn new(kind: FlowKind, duration_secs: u32) -> Self {
        Self {
            kind,
            step: first_step(kind),
            timer: UrgeSession::new(duration_secs),
            breath: BreathPhase::Inhale,
            task_index: 0,
            activity: None,
        }
    }

    /// Delay, breathe, coping task, log
    pub fn guided(duration_secs: u32) -> Self {
        Self::new(FlowKind::Guided, duration_secs)
    }

    /// Countdown with a free activity, log, feedback
    pub fn session(duration_secs: u32) -> Self {
        Self::new(FlowKind::Session, duration_secs)
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.step == FlowStep::Finished
    }

    pub fn timer(&self) -> &UrgeSession {
        &self.timer
    }

    /// The shell starts, pauses and reconciles the countdown through this
    pub fn timer_mut(&mut self) -> &mut UrgeSession {
        &mut self.timer
    }

    pub fn breath_phase(&self) -> BreathPhase {
        self.breath
    }

    pub fn coping_task(&self) -> &'static str {
        COPING_TASKS[self.task_index % COPING_TASKS.len()]
    }

    pub fn activity(&self) -> Option<UrgeActivity> {
        self.activity
    }

    /// Tick the owned countdown once and advance if it ran out
    pub fn tick(&mut self) -> Option<FlowEvent> {
        if !self.on_timer_step() {
            return None;
        }
        self.timer.tick();
        self.poll_timer()
    }

    /// Advance past the countdown if it has expired
    pub fn poll_timer(&mut self) -> Option<FlowEvent> {
        if self.on_timer_step() && self.timer.state() == SessionState::Expired {
            return Some(self.leave_timer_step());
        }
        None
    }

    /// Apply a shell signal. Signals that do not fit the current step are
    /// rejected without changing anything.
    pub fn handle(&mut self, signal: FlowSignal) -> Result<FlowEvent> {
        match (self.step, signal) {
            (FlowStep::Delay | FlowStep::Countdown, FlowSignal::TimerExpired)
                if self.timer.state() == SessionState::Expired =>
            {
                Ok(self.leave_timer_step())
            }

            (FlowStep::Delay | FlowStep::Countdown, FlowSignal::Skip)
                if self.timer.remaining() < self.timer.duration() =>
            {
                self.timer.pause();
                debug!(remaining = self.timer.remaining(), "Countdown skipped");
                Ok(self.leave_timer_step())
            }

            (FlowStep::Countdown, FlowSignal::PickActivity(activity)) => {
                self.activity = Some(activity);
                if self.timer.state() == SessionState::Idle {
                    self.timer.start();
                }
                debug!(activity = activity.title(), "Activity picked");
                Ok(FlowEvent::ActivityPicked(activity))
            }

            (FlowStep::Breathe, FlowSignal::Confirm) => match self.breath.next() {
                Some(next) => {
                    self.breath = next;
                    Ok(FlowEvent::BreathPhaseChanged(next))
                }
                None => Ok(self.go_to(FlowStep::CopingTask)),
            },

            (FlowStep::CopingTask, FlowSignal::NewIdea) => {
                self.task_index = (self.task_index + 1) % COPING_TASKS.len();
                Ok(FlowEvent::TaskSuggested(self.coping_task()))
            }

            (FlowStep::CopingTask, FlowSignal::Confirm) => Ok(self.go_to(FlowStep::LogOutcome)),

            (step, signal) => Err(BreakerError::unexpected_signal(step, signal)),
        }
    }

    /// Write the outcome to the journal: exactly one of a success or a
    /// relapse.
    pub fn submit_outcome(
        &mut self,
        outcome: Outcome,
        journal: &mut JournalStore,
        now: DateTime<Local>,
    ) -> Result<FlowEvent> {
        if self.step != FlowStep::LogOutcome {
            return Err(BreakerError::unexpected_signal(self.step, "SubmitOutcome"));
        }

        let relapse_id = match outcome {
            Outcome::Success => {
                journal.log_success();
                None
            }
            Outcome::Relapse { trigger, notes } => Some(journal.log_relapse(trigger, notes, now)),
        };

        let next = match self.kind {
            FlowKind::Guided => FlowStep::Finished,
            FlowKind::Session => FlowStep::Feedback,
        };
        info!(kind = ?self.kind, relapsed = relapse_id.is_some(), "Urge outcome logged");
        self.step = next;

        Ok(FlowEvent::OutcomeLogged { relapse_id, next })
    }

    /// Record whether the session helped, then finish
    pub fn submit_feedback(&mut self, helped: bool, journal: &mut JournalStore) -> Result<FlowEvent> {
        if self.step != FlowStep::Feedback {
            return Err(BreakerError::unexpected_signal(self.step, "SubmitFeedback"));
        }

        journal.record_sos_feedback(helped);
        self.step = FlowStep::Finished;
        Ok(FlowEvent::FeedbackRecorded { helped })
    }

    /// Back to the first step with a fresh countdown
    pub fn restart(&mut self) {
        self.step = first_step(self.kind);
        self.timer.reset();
        self.breath = BreathPhase::Inhale;
        self.task_index = 0;
        self.activity = None;
    }

    /// `Delay` or `Countdown`
    pub(crate) fn on_timer_step(&self) -> bool {
        matches!(self.step, FlowStep::Delay | FlowStep::Countdown)
    }

    fn leave_timer_step(&mut self) -> FlowEvent {
        let next = match self.kind {
            FlowKind::Guided => FlowStep::Breathe,
            FlowKind::Session => FlowStep::LogOutcome,
        };
        self.breath = BreathPhase::Inhale;
        self.go_to(next)
    }

    fn go_to(&mut self, to: FlowStep) -> FlowEvent {
        let from = self.step;
        self.step = to;
        debug!(?from, ?to, "Flow step changed");
        FlowEvent::StepChanged { from, to }
    }
}

fn first_step(kind: FlowKind) -> FlowStep {
    match kind {
        FlowKind::Guided => FlowStep::Delay,
        FlowKind::Session => FlowStep::Countdown,
    }
}
