//! The journal document
//!
//! `AppState` is serialized as a single JSON object with camelCase keys.
//! Missing fields fall back to defaults, in nested records too, so a
//! document written by an older build never fails to decode as a whole.
//! Record ids default to a fresh id. Only the `date` of a relapse or a
//! check-in has no sensible fallback and stays required.

use breaker_util::{BuddyId, CheckInId, RelapseId, RuleId, TimeOfDay, UrgeId};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::DEFAULT_PANIC_PLAN;

/// Kind of habit being broken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitType {
    #[default]
    Nicotine,
    Sugar,
    Doomscrolling,
    Alcohol,
    Gambling,
    Porn,
    Custom,
}

impl HabitType {
    /// Label shown to the user
    pub fn display(&self) -> &'static str {
        match self {
            HabitType::Nicotine => "Nicotine",
            HabitType::Sugar => "Sugar",
            HabitType::Doomscrolling => "Doomscrolling",
            HabitType::Alcohol => "Alcohol",
            HabitType::Gambling => "Gambling",
            HabitType::Porn => "Adult Content",
            HabitType::Custom => "Custom",
        }
    }
}

/// The habit chosen during onboarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HabitConfig {
    #[serde(rename = "type")]
    pub kind: HabitType,
    pub custom_name: Option<String>,
    pub triggers: Vec<String>,
    pub panic_plan: String,
}

impl HabitConfig {
    pub fn new(kind: HabitType) -> Self {
        Self {
            kind,
            custom_name: None,
            triggers: Vec::new(),
            panic_plan: DEFAULT_PANIC_PLAN.to_string(),
        }
    }

    /// Name for headers: the custom name (or "My Habit") for custom habits
    pub fn display_name(&self) -> &str {
        match self.kind {
            HabitType::Custom => self.custom_name.as_deref().unwrap_or("My Habit"),
            other => other.display(),
        }
    }
}

impl Default for HabitConfig {
    fn default() -> Self {
        Self::new(HabitType::Nicotine)
    }
}

/// A logged relapse. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelapseEvent {
    #[serde(default)]
    pub id: RelapseId,
    pub date: DateTime<Local>,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Implementation intention: "when `cue`, do `action`"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfThenRule {
    #[serde(default)]
    pub id: RuleId,
    #[serde(default)]
    pub cue: String,
    #[serde(default)]
    pub action: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn default_mood() -> u8 {
    3
}

/// Accountability buddy
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuddyContact {
    pub id: BuddyId,
    pub name: String,
    pub phone: String,
}

/// Daily check-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    #[serde(default)]
    pub id: CheckInId,
    pub date: DateTime<Local>,
    /// 1 (bad) ..= 5 (great), neutral if missing
    #[serde(default = "default_mood")]
    pub mood: u8,
    /// 0 (none) ..= 10 (overwhelming)
    #[serde(default)]
    pub craving: u8,
    /// HALT factors ticked (Hungry, Angry, Lonely, Tired, ...)
    #[serde(default)]
    pub halt: BTreeSet<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An urge the user tracks separately from the main habit.
///
/// `current_streak` is its own counter. It is not derived from the global
/// relapse log and logging a global relapse does not touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUrge {
    #[serde(default)]
    pub id: UrgeId,
    #[serde(default, rename = "type")]
    pub kind: HabitType,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub what_doing_now: Option<String>,
    #[serde(default)]
    pub what_works: Vec<String>,
    #[serde(default)]
    pub what_doesnt: Vec<String>,
    #[serde(default)]
    pub temptations: Vec<String>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub last_relapse_date: Option<DateTime<Local>>,
    /// Load time if missing
    #[serde(default = "breaker_util::now")]
    pub created_at: DateTime<Local>,
}

impl UserUrge {
    pub fn new(kind: HabitType, created_at: DateTime<Local>) -> Self {
        Self {
            id: UrgeId::new(),
            kind,
            custom_name: None,
            what_doing_now: None,
            what_works: Vec::new(),
            what_doesnt: Vec::new(),
            temptations: Vec::new(),
            current_streak: 0,
            last_relapse_date: None,
            created_at,
        }
    }
}

/// Post-intervention tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SosFeedback {
    pub helped_count: u32,
    pub still_urge_count: u32,
}

/// Root journal document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppState {
    pub has_onboarded: bool,
    pub habit: HabitConfig,
    pub relapse_log: Vec<RelapseEvent>,
    pub successful_urges: u32,
    pub daily_reminders_enabled: bool,
    pub reminder_times: Vec<TimeOfDay>,
    pub if_then_rules: Vec<IfThenRule>,
    pub buddies: Vec<BuddyContact>,
    pub check_ins: Vec<CheckIn>,
    pub home_address: Option<String>,
    pub my_urges: Vec<UserUrge>,
    pub game_high_score: u32,
    pub sos_feedback: SosFeedback,
    /// First-run anchor for the streak when nothing has been relapsed yet
    pub installed_at: Option<DateTime<Local>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            has_onboarded: false,
            habit: HabitConfig::default(),
            relapse_log: Vec::new(),
            successful_urges: 0,
            daily_reminders_enabled: false,
            reminder_times: Vec::new(),
            if_then_rules: Vec::new(),
            buddies: Vec::new(),
            check_ins: Vec::new(),
            home_address: None,
            my_urges: Vec::new(),
            game_high_score: 0,
            sos_feedback: SosFeedback::default(),
            installed_at: None,
        }
    }
}

impl AppState {
    /// Most recent relapse by date, not by insertion order
    pub fn last_relapse(&self) -> Option<&RelapseEvent> {
        self.relapse_log.iter().max_by_key(|e| e.date)
    }

    pub fn urge(&self, id: &UrgeId) -> Option<&UserUrge> {
        self.my_urges.iter().find(|u| &u.id == id)
    }

    pub fn rule(&self, id: &RuleId) -> Option<&IfThenRule> {
        self.if_then_rules.iter().find(|r| &r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_document_decodes_to_defaults() {
        let state: AppState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, AppState::default());
        assert_eq!(state.habit.panic_plan, DEFAULT_PANIC_PLAN);
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let mut state = AppState::default();
        state.has_onboarded = true;
        state.game_high_score = 12;

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["hasOnboarded"], true);
        assert_eq!(json["gameHighScore"], 12);
        assert_eq!(json["habit"]["type"], "nicotine");
        assert_eq!(json["sosFeedback"]["helpedCount"], 0);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let state: AppState =
            serde_json::from_str(r#"{"successfulUrges": 3, "someFutureField": [1, 2]}"#).unwrap();
        assert_eq!(state.successful_urges, 3);
    }

    #[test]
    fn habit_without_type_defaults() {
        let state: AppState =
            serde_json::from_str(r#"{"successfulUrges": 7, "habit": {"panicPlan": "walk"}}"#).unwrap();
        assert_eq!(state.successful_urges, 7);
        assert_eq!(state.habit.kind, HabitType::Nicotine);
        assert_eq!(state.habit.panic_plan, "walk");
        assert!(state.habit.triggers.is_empty());
    }

    #[test]
    fn rule_without_action_defaults() {
        let state: AppState = serde_json::from_str(
            r#"{"successfulUrges": 7, "ifThenRules": [{"cue": "after dinner"}]}"#,
        )
        .unwrap();
        assert_eq!(state.successful_urges, 7);

        let rule = &state.if_then_rules[0];
        assert_eq!(rule.cue, "after dinner");
        assert_eq!(rule.action, "");
        assert!(rule.is_active);
    }

    #[test]
    fn rule_without_cue_defaults() {
        let state: AppState =
            serde_json::from_str(r#"{"ifThenRules": [{"action": "go for a walk"}]}"#).unwrap();
        assert_eq!(state.if_then_rules[0].cue, "");
        assert_eq!(state.if_then_rules[0].action, "go for a walk");
    }

    #[test]
    fn buddy_without_name_or_phone_defaults() {
        let state: AppState =
            serde_json::from_str(r#"{"buddies": [{"name": "Sam"}, {"phone": "555-0100"}]}"#).unwrap();
        assert_eq!(state.buddies.len(), 2);
        assert_eq!(state.buddies[0].phone, "");
        assert_eq!(state.buddies[1].name, "");
        assert_ne!(state.buddies[0].id, state.buddies[1].id);
    }

    #[test]
    fn check_in_without_scores_defaults() {
        let state: AppState = serde_json::from_str(
            r#"{"checkIns": [{"date": "2025-06-01T09:00:00+00:00", "halt": ["Tired"]}]}"#,
        )
        .unwrap();
        let check_in = &state.check_ins[0];
        assert_eq!(check_in.mood, 3);
        assert_eq!(check_in.craving, 0);
        assert!(check_in.halt.contains("Tired"));
    }

    #[test]
    fn urge_without_type_or_created_at_defaults() {
        let state: AppState = serde_json::from_str(
            r#"{"gameHighScore": 99, "myUrges": [{"currentStreak": 4, "customName": "Vaping"}]}"#,
        )
        .unwrap();
        assert_eq!(state.game_high_score, 99);

        let urge = &state.my_urges[0];
        assert_eq!(urge.kind, HabitType::Nicotine);
        assert_eq!(urge.current_streak, 4);
        assert_eq!(urge.custom_name.as_deref(), Some("Vaping"));
    }

    #[test]
    fn relapse_without_id_gets_one() {
        let state: AppState =
            serde_json::from_str(r#"{"relapseLog": [{"date": "2025-06-01T21:15:00+00:00"}]}"#).unwrap();
        assert_eq!(state.relapse_log.len(), 1);
        assert!(state.relapse_log[0].trigger.is_none());
    }

    #[test]
    fn last_relapse_picks_max_date() {
        let mut state = AppState::default();
        let newer = Local.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
        let older = Local.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();

        for date in [newer, older] {
            state.relapse_log.push(RelapseEvent {
                id: RelapseId::new(),
                date,
                trigger: None,
                notes: None,
            });
        }

        assert_eq!(state.last_relapse().unwrap().date, newer);
    }

    #[test]
    fn custom_habit_display_name() {
        let mut habit = HabitConfig::new(HabitType::Custom);
        assert_eq!(habit.display_name(), "My Habit");

        habit.custom_name = Some("Energy drinks".into());
        assert_eq!(habit.display_name(), "Energy drinks");

        assert_eq!(HabitConfig::new(HabitType::Porn).display_name(), "Adult Content");
    }
}
