use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::model::Snapshot;

/// Minute-resolution alert checker.
///
/// Each tick looks at the reminders occurring today and tomorrow
/// (through the occurrence predicate) and fires any alert offset whose
/// trigger minute is the current minute. A fired `(id, date, offset)`
/// never fires again within the same run.
pub struct AlertClock {
    fired: HashSet<(String, NaiveDate, u32)>,
    last_minute: Option<NaiveDateTime>,
}

impl AlertClock {
    pub fn new() -> Self {
        Self {
            fired: HashSet::new(),
            last_minute: None,
        }
    }

    /// Returns one status message per alert due at `now`.
    pub fn check(&mut self, snapshot: &Snapshot, now: NaiveDateTime) -> Vec<String> {
        let minute = truncate_to_minute(now);
        if self.last_minute == Some(minute) {
            return Vec::new();
        }
        self.last_minute = Some(minute);

        let today = minute.date();
        let mut messages = Vec::new();

        // An offset can put the trigger minute on the day before the
        // occurrence (00:10 event, 15-minute offset), so tomorrow's
        // occurrences are scanned as well.
        for day in [Some(today), today.succ_opt()].into_iter().flatten() {
            for reminder in snapshot.reminders_on(day) {
                let Ok(time) = NaiveTime::parse_from_str(&reminder.time, "%H:%M") else {
                    continue;
                };
                let event = day.and_time(time);
                for &offset in &reminder.alerts {
                    if event - Duration::minutes(i64::from(offset)) != minute {
                        continue;
                    }
                    let key = (reminder.id.clone(), day, offset);
                    if !self.fired.insert(key) {
                        continue;
                    }
                    let message = if offset == 0 {
                        format!("{} now ({})", reminder.title, reminder.time)
                    } else {
                        format!("{} in {} min ({})", reminder.title, offset, reminder.time)
                    };
                    messages.push(message);
                }
            }
        }
        messages
    }
}

fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Reminder, RepeatFrequency};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn daily(time: &str, alerts: Vec<u32>) -> Reminder {
        Reminder {
            id: "r1".to_string(),
            title: "Standup".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            time: time.to_string(),
            color: "#3b82f6".to_string(),
            category: None,
            created_at: 0,
            repeat: RepeatFrequency::Daily,
            alerts,
            is_completed: false,
        }
    }

    #[test]
    fn fires_at_the_offset_minute_once() {
        let snap = Snapshot::build(&[daily("09:30", vec![15])], &[]);
        let mut clock = AlertClock::new();

        assert!(clock.check(&snap, at(2024, 3, 1, 9, 14)).is_empty());
        let fired = clock.check(&snap, at(2024, 3, 1, 9, 15));
        assert_eq!(fired, ["Standup in 15 min (09:30)"]);

        // Same minute again and the following minute stay quiet.
        assert!(clock.check(&snap, at(2024, 3, 1, 9, 15)).is_empty());
        assert!(clock.check(&snap, at(2024, 3, 1, 9, 16)).is_empty());

        // A new day is a new occurrence.
        let next_day = clock.check(&snap, at(2024, 3, 2, 9, 15));
        assert_eq!(next_day.len(), 1);
    }

    #[test]
    fn zero_offset_fires_at_event_time() {
        let snap = Snapshot::build(&[daily("09:30", vec![0])], &[]);
        let mut clock = AlertClock::new();
        let fired = clock.check(&snap, at(2024, 3, 1, 9, 30));
        assert_eq!(fired, ["Standup now (09:30)"]);
    }

    #[test]
    fn offsets_crossing_midnight_fire_the_evening_before() {
        let snap = Snapshot::build(&[daily("00:10", vec![15])], &[]);
        let mut clock = AlertClock::new();

        let fired = clock.check(&snap, at(2024, 3, 1, 23, 55));
        assert_eq!(fired, ["Standup in 15 min (00:10)"]);

        // The same occurrence stays fired; the next night fires again.
        assert!(clock.check(&snap, at(2024, 3, 1, 23, 55)).is_empty());
        assert_eq!(clock.check(&snap, at(2024, 3, 2, 23, 55)).len(), 1);
    }

    #[test]
    fn non_occurring_days_never_alert() {
        let mut weekly = daily("09:30", vec![15]);
        weekly.repeat = RepeatFrequency::Weekly; // anchored Mon 2024-01-01
        let snap = Snapshot::build(&[weekly], &[]);
        let mut clock = AlertClock::new();
        // 2024-03-01 is a Friday.
        assert!(clock.check(&snap, at(2024, 3, 1, 9, 15)).is_empty());
        // 2024-03-04 is a Monday.
        assert_eq!(clock.check(&snap, at(2024, 3, 4, 9, 15)).len(), 1);
    }
}
