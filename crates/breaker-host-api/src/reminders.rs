//! Daily check-in reminder content

use breaker_util::TimeOfDay;

use crate::ReminderRequest;

pub const REMINDER_TITLE: &str = "Check-in";
pub const REMINDER_BODY: &str = "Quick urge check: 2 mins of breathing beats 20 mins of regret.";

/// One repeating request per time, identified `daily-0`, `daily-1`, ...
pub fn build_reminder_requests(times: &[TimeOfDay]) -> Vec<ReminderRequest> {
    times
        .iter()
        .enumerate()
        .map(|(idx, time)| ReminderRequest {
            identifier: format!("daily-{}", idx),
            title: REMINDER_TITLE.to_string(),
            body: REMINDER_BODY.to_string(),
            time: *time,
            repeats_daily: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_follow_input_order() {
        let times = vec![
            TimeOfDay::new(20, 0).unwrap(),
            TimeOfDay::new(9, 30).unwrap(),
        ];
        let requests = build_reminder_requests(&times);

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].identifier, "daily-0");
        assert_eq!(requests[0].time, times[0]);
        assert_eq!(requests[1].identifier, "daily-1");
        assert_eq!(requests[1].time.to_string(), "09:30");
        assert!(requests.iter().all(|r| r.repeats_daily));
        assert!(requests.iter().all(|r| r.title == REMINDER_TITLE));
    }

    #[test]
    fn no_times_no_requests() {
        assert!(build_reminder_requests(&[]).is_empty());
    }
}
