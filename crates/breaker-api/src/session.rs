//! Urge session and guided-flow types shared with the shell

use serde::{Deserialize, Serialize};

/// Countdown state of an urge session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Expired,
}

/// What the ticker publishes after every change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub duration_secs: u32,
    pub remaining_secs: u32,
}

impl SessionSnapshot {
    /// 0.0 at start, 1.0 when expired
    pub fn progress(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.duration_secs as f64)
    }
}

/// Free activity picked while the countdown runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgeActivity {
    Game,
    Puzzle,
    Zen,
    Math,
    Buddy,
}

impl UrgeActivity {
    pub fn title(&self) -> &'static str {
        match self {
            UrgeActivity::Game => "Beat your high score",
            UrgeActivity::Puzzle => "Solve a puzzle",
            UrgeActivity::Zen => "Sit in silence",
            UrgeActivity::Math => "Practice math",
            UrgeActivity::Buddy => "AI buddy support",
        }
    }
}

/// Result the user reports at the end of a flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Rode out the urge
    Success,
    /// Relapsed
    Relapse {
        trigger: Option<String>,
        notes: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_progress() {
        let snapshot = SessionSnapshot {
            state: SessionState::Running,
            duration_secs: 600,
            remaining_secs: 150,
        };
        assert!((snapshot.progress() - 0.75).abs() < f64::EPSILON);

        let empty = SessionSnapshot {
            state: SessionState::Idle,
            duration_secs: 0,
            remaining_secs: 0,
        };
        assert_eq!(empty.progress(), 0.0);
    }

    #[test]
    fn outcome_serialization() {
        let outcome = Outcome::Relapse {
            trigger: Some("stress".into()),
            notes: None,
        };

        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"type\":\"relapse\""));

        let parsed: Outcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, outcome);
    }
}
