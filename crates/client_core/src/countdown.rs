use chrono::{DateTime, Duration, Utc};

/// Remaining time until the event, split the way an invitation displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// `None` once the target moment has passed. No timers here; callers decide
/// when to recompute.
pub fn time_until(target: DateTime<Utc>, now: DateTime<Utc>) -> Option<TimeLeft> {
    let diff = target - now;
    if diff <= Duration::zero() {
        return None;
    }
    Some(TimeLeft {
        days: diff.num_days(),
        hours: diff.num_hours() % 24,
        minutes: diff.num_minutes() % 60,
        seconds: diff.num_seconds() % 60,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn splits_a_known_delta() {
        let now = at(2026, 2, 19, 12, 0, 0);
        let target = at(2026, 2, 21, 18, 30, 45);
        let left = time_until(target, now).expect("future date");
        assert_eq!(
            left,
            TimeLeft {
                days: 2,
                hours: 6,
                minutes: 30,
                seconds: 45,
            }
        );
    }

    #[test]
    fn past_dates_yield_none() {
        let now = at(2026, 3, 1, 0, 0, 0);
        let target = at(2026, 2, 21, 18, 30, 0);
        assert_eq!(time_until(target, now), None);
        assert_eq!(time_until(now, now), None);
    }

    #[test]
    fn sub_second_remainder_rounds_down_to_zero() {
        let now = at(2026, 2, 21, 18, 29, 59);
        let target = at(2026, 2, 21, 18, 30, 0);
        let left = time_until(target, now).expect("one second left");
        assert_eq!(left.days, 0);
        assert_eq!(left.seconds, 1);
    }
}
