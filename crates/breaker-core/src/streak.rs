//! Streak and relapse-risk calculation
//!
//! Nothing here is stored. The streak is recomputed from the relapse log
//! every time it is shown, so a clock change or an out-of-order log entry
//! can never leave a stale number behind.

use breaker_api::AppState;
use breaker_util::calendar_days_between;
use chrono::{DateTime, Duration, Local, Timelike};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Date of the most recent relapse, by date rather than log order
pub fn last_relapse(state: &AppState) -> Option<DateTime<Local>> {
    state.last_relapse().map(|e| e.date)
}

/// Whole local calendar days since the last relapse.
///
/// Without any relapse the install anchor is used instead. Documents from
/// before the anchor existed count from yesterday, i.e. a streak of 1.
pub fn streak_days(state: &AppState, now: DateTime<Local>) -> u32 {
    let anchor = last_relapse(state)
        .or(state.installed_at)
        .unwrap_or_else(|| now - Duration::days(1));

    calendar_days_between(&anchor, &now).clamp(0, u32::MAX as i64) as u32
}

/// Risk contribution of the hour of day (0..=23)
pub fn time_risk(hour: u32) -> f64 {
    match hour {
        18..=22 => 0.55,
        14..=17 => 0.35,
        _ => 0.15,
    }
}

/// Risk contribution of the streak length: 1.0 on day 0, halving by day 1
pub fn streak_risk(days: u32) -> f64 {
    1.0 / (1.0 + days as f64)
}

/// Weighted relapse risk in 0.0..=1.0
pub fn risk_score(state: &AppState, now: DateTime<Local>) -> f64 {
    let time = time_risk(now.hour());
    let streak = streak_risk(streak_days(state, now));
    (0.6 * time + 0.4 * streak).clamp(0.0, 1.0)
}

/// Bucketed risk for the risk meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.33 {
            RiskLevel::Low
        } else if score < 0.66 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Suggestion shown under the meter
    pub fn hint(&self) -> &'static str {
        match self {
            RiskLevel::High => "High-risk window. Try a quick plan: delay 5m → breathe → text buddy.",
            RiskLevel::Medium => "Medium risk. A 2-minute breathing break helps a lot.",
            RiskLevel::Low => "Looking good. Keep easy wins going.",
        }
    }
}

/// Score and level together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
}

pub fn assess_risk(state: &AppState, now: DateTime<Local>) -> RiskAssessment {
    let score = risk_score(state, now);
    let level = RiskLevel::from_score(score);
    trace!(score, level = level.label(), "Relapse risk assessed");
    RiskAssessment { score, level }
}
