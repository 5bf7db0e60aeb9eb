use chrono::{Datelike, NaiveDate};

use super::reminder::{Reminder, RepeatFrequency};

/// Does `reminder` occur on `target`?
///
/// A non-recurring reminder occurs exactly on its anchor date. A
/// recurring one occurs on the anchor and on every later date matching
/// its frequency; never before the anchor.
///
/// Monthly and yearly rules use strict day-of-month equality: an anchor
/// on the 31st produces nothing in a 30-day month, and a Feb 29 anchor
/// produces nothing in non-leap years. There is no end-of-month
/// rollover.
pub fn is_occurrence(reminder: &Reminder, target: NaiveDate) -> bool {
    let anchor = reminder.date;
    match reminder.repeat {
        RepeatFrequency::None => target == anchor,
        _ if target < anchor => false,
        RepeatFrequency::Daily => true,
        RepeatFrequency::Weekly => target.weekday() == anchor.weekday(),
        RepeatFrequency::Monthly => target.day() == anchor.day(),
        RepeatFrequency::Yearly => {
            target.month() == anchor.month() && target.day() == anchor.day()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reminder::EventCategory;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reminder(anchor: NaiveDate, repeat: RepeatFrequency) -> Reminder {
        Reminder {
            id: "r1".to_string(),
            title: "standup".to_string(),
            description: None,
            date: anchor,
            time: "09:00".to_string(),
            color: "#3b82f6".to_string(),
            category: Some(EventCategory::Work),
            created_at: 0,
            repeat,
            alerts: Vec::new(),
            is_completed: false,
        }
    }

    #[test]
    fn non_recurring_matches_only_its_anchor() {
        let r = reminder(date(2024, 1, 10), RepeatFrequency::None);
        assert!(is_occurrence(&r, date(2024, 1, 10)));
        assert!(!is_occurrence(&r, date(2024, 1, 9)));
        assert!(!is_occurrence(&r, date(2024, 1, 11)));
        assert!(!is_occurrence(&r, date(2025, 1, 10)));
    }

    #[test]
    fn recurrence_is_never_retroactive() {
        for repeat in [
            RepeatFrequency::Daily,
            RepeatFrequency::Weekly,
            RepeatFrequency::Monthly,
            RepeatFrequency::Yearly,
        ] {
            let r = reminder(date(2024, 1, 10), repeat);
            assert!(
                !is_occurrence(&r, date(2024, 1, 9)),
                "{} fired before its anchor",
                repeat.label()
            );
            assert!(!is_occurrence(&r, date(2023, 12, 10)));
        }
    }

    #[test]
    fn daily_matches_every_date_from_anchor() {
        let r = reminder(date(2024, 1, 10), RepeatFrequency::Daily);
        assert!(is_occurrence(&r, date(2024, 1, 10)));
        assert!(is_occurrence(&r, date(2024, 1, 11)));
        assert!(is_occurrence(&r, date(2024, 6, 1)));
        assert!(!is_occurrence(&r, date(2024, 1, 9)));
    }

    #[test]
    fn weekly_matches_same_weekday() {
        // 2024-01-10 is a Wednesday.
        let r = reminder(date(2024, 1, 10), RepeatFrequency::Weekly);
        assert!(is_occurrence(&r, date(2024, 1, 10)));
        assert!(is_occurrence(&r, date(2024, 1, 17)));
        assert!(is_occurrence(&r, date(2024, 2, 7)));
        assert!(!is_occurrence(&r, date(2024, 1, 11))); // Thursday
        assert!(!is_occurrence(&r, date(2024, 1, 16))); // Tuesday
    }

    #[test]
    fn monthly_day_31_skips_short_months() {
        let r = reminder(date(2024, 1, 31), RepeatFrequency::Monthly);
        // February has no 31st; the rule does not roll to month end.
        assert!(!is_occurrence(&r, date(2024, 2, 29)));
        for d in 1..=29 {
            assert!(!is_occurrence(&r, date(2024, 2, d)));
        }
        assert!(is_occurrence(&r, date(2024, 3, 31)));
        assert!(!is_occurrence(&r, date(2024, 4, 30)));
        assert!(is_occurrence(&r, date(2024, 5, 31)));
    }

    #[test]
    fn monthly_matches_same_day_of_month() {
        let r = reminder(date(2024, 1, 15), RepeatFrequency::Monthly);
        assert!(is_occurrence(&r, date(2024, 2, 15)));
        assert!(is_occurrence(&r, date(2025, 7, 15)));
        assert!(!is_occurrence(&r, date(2024, 2, 14)));
    }

    #[test]
    fn yearly_leap_day_only_fires_in_leap_years() {
        let r = reminder(date(2024, 2, 29), RepeatFrequency::Yearly);
        assert!(is_occurrence(&r, date(2024, 2, 29)));
        assert!(!is_occurrence(&r, date(2025, 2, 28)));
        assert!(!is_occurrence(&r, date(2025, 3, 1)));
        assert!(is_occurrence(&r, date(2028, 2, 29)));
    }

    #[test]
    fn yearly_matches_same_month_and_day() {
        let r = reminder(date(2024, 7, 4), RepeatFrequency::Yearly);
        assert!(is_occurrence(&r, date(2025, 7, 4)));
        assert!(!is_occurrence(&r, date(2025, 7, 5)));
        assert!(!is_occurrence(&r, date(2025, 6, 4)));
    }

    #[test]
    fn predicate_is_pure() {
        let r = reminder(date(2024, 1, 10), RepeatFrequency::Weekly);
        let target = date(2024, 1, 17);
        let first = is_occurrence(&r, target);
        for _ in 0..10 {
            assert_eq!(is_occurrence(&r, target), first);
        }
    }
}
