//! Events emitted by the urge flow

use breaker_api::UrgeActivity;
use breaker_util::RelapseId;

use crate::{BreathPhase, FlowStep};

/// What changed after a flow signal, timer poll or submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// Moved to another step
    StepChanged { from: FlowStep, to: FlowStep },

    /// Next 4-7-8 breathing phase
    BreathPhaseChanged(BreathPhase),

    /// A different coping task is suggested
    TaskSuggested(&'static str),

    /// Free activity chosen during the countdown
    ActivityPicked(UrgeActivity),

    /// The outcome went into the journal
    OutcomeLogged {
        relapse_id: Option<RelapseId>,
        next: FlowStep,
    },

    /// SOS feedback went into the journal; the flow is finished
    FeedbackRecorded { helped: bool },
}
