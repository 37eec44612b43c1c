//! Trend series for the insights screen

use breaker_api::{AppState, HabitConfig};
use breaker_util::local_day;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// One point of a daily series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayPoint {
    pub day: NaiveDate,
    pub value: f64,
}

/// Craving level of every check-in, oldest first
pub fn craving_series(state: &AppState) -> Vec<DayPoint> {
    let mut check_ins: Vec<_> = state.check_ins.iter().collect();
    check_ins.sort_by_key(|c| c.date);

    check_ins
        .into_iter()
        .map(|c| DayPoint {
            day: local_day(&c.date),
            value: c.craving as f64,
        })
        .collect()
}

/// Number of relapses on each day that had any, oldest first
pub fn relapses_per_day(state: &AppState) -> Vec<(NaiveDate, u32)> {
    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for event in &state.relapse_log {
        *counts.entry(local_day(&event.date)).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Successful urges spread evenly over the days with a check-in.
///
/// Urges are not dated, so this is only a rough daily rate.
pub fn success_series(state: &AppState) -> Vec<DayPoint> {
    let days: BTreeSet<NaiveDate> = state.check_ins.iter().map(|c| local_day(&c.date)).collect();
    if days.is_empty() {
        return Vec::new();
    }

    let per_day = state.successful_urges as f64 / days.len() as f64;
    days.into_iter()
        .map(|day| DayPoint {
            day,
            value: per_day,
        })
        .collect()
}

/// Header name for the tracked habit
pub fn habit_display_name(habit: &HabitConfig) -> &str {
    habit.display_name()
}

#[cfg(test)]
mod tests {
    use super::*;
    use breaker_api::{CheckIn, HabitType, RelapseEvent};
    use breaker_util::{CheckInId, RelapseId};
    use chrono::{DateTime, Local, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 4, day, hour, 0, 0).unwrap()
    }

    fn check_in(date: DateTime<Local>, craving: u8) -> CheckIn {
        CheckIn {
            id: CheckInId::new(),
            date,
            mood: 3,
            craving,
            halt: BTreeSet::new(),
            notes: None,
        }
    }

    fn relapse(date: DateTime<Local>) -> RelapseEvent {
        RelapseEvent {
            id: RelapseId::new(),
            date,
            trigger: None,
            notes: None,
        }
    }

    #[test]
    fn test_craving_series_sorted_by_date() {
        let mut state = AppState::default();
        state.check_ins = vec![check_in(at(3, 9), 7), check_in(at(1, 9), 2)];

        let series = craving_series(&state);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].day, at(1, 9).date_naive());
        assert_eq!(series[0].value, 2.0);
        assert_eq!(series[1].value, 7.0);
    }

    #[test]
    fn test_relapses_grouped_by_day() {
        let mut state = AppState::default();
        state.relapse_log = vec![relapse(at(5, 22)), relapse(at(2, 8)), relapse(at(5, 7))];

        let grouped = relapses_per_day(&state);
        assert_eq!(
            grouped,
            vec![(at(2, 8).date_naive(), 1), (at(5, 7).date_naive(), 2)]
        );
    }

    #[test]
    fn test_success_series_spread() {
        let mut state = AppState::default();
        assert!(success_series(&state).is_empty());

        state.successful_urges = 6;
        state.check_ins = vec![
            check_in(at(1, 9), 2),
            check_in(at(1, 21), 4),
            check_in(at(2, 9), 1),
            check_in(at(4, 9), 0),
        ];

        let series = success_series(&state);
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|p| p.value == 2.0));
    }

    #[test]
    fn test_habit_display_name() {
        let mut habit = HabitConfig::new(HabitType::Custom);
        assert_eq!(habit_display_name(&habit), "My Habit");

        habit.custom_name = Some("Nail biting".into());
        assert_eq!(habit_display_name(&habit), "Nail biting");

        assert_eq!(
            habit_display_name(&HabitConfig::new(HabitType::Porn)),
            "Adult Content"
        );
    }
}
