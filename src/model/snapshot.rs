use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};

use super::recurrence::is_occurrence;
use super::reminder::{EventCategory, Reminder};
use super::todo::Todo;

/// Immutable per-query view over the store's flat collections.
///
/// Non-recurring reminders are bucketed by their anchor date; recurring
/// ones stay in a flat list and are evaluated against each queried date
/// through the occurrence predicate. Occurrences are never materialized
/// into per-date storage.
#[derive(Debug, Default)]
pub struct Snapshot {
    dated: BTreeMap<NaiveDate, Vec<Reminder>>,
    recurring: Vec<Reminder>,
    todos: BTreeMap<NaiveDate, Vec<Todo>>,
}

#[derive(Debug, Clone)]
pub enum SearchHit {
    Reminder(Reminder),
    Recurring(Reminder),
    Todo(Todo),
}

impl SearchHit {
    /// The date a hit is reported at; recurring reminders show their anchor.
    pub fn date(&self) -> NaiveDate {
        match self {
            SearchHit::Reminder(r) | SearchHit::Recurring(r) => r.date,
            SearchHit::Todo(t) => t.date,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SearchHit::Reminder(r) | SearchHit::Recurring(r) => &r.title,
            SearchHit::Todo(t) => &t.text,
        }
    }

    fn sort_time(&self) -> &str {
        match self {
            SearchHit::Reminder(r) | SearchHit::Recurring(r) => &r.time,
            SearchHit::Todo(_) => "00:00",
        }
    }
}

/// Month dashboard numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthStats {
    pub total_todos: usize,
    pub completed_todos: usize,
    /// Whole percent, 0 when there are no todos.
    pub completion_rate: u32,
    /// Non-recurring reminders anchored inside the month.
    pub month_reminders: usize,
    /// Category distribution; each recurring rule counts once.
    pub category_counts: Vec<(EventCategory, usize)>,
}

impl Snapshot {
    pub fn build(reminders: &[Reminder], todos: &[Todo]) -> Self {
        let mut snap = Snapshot::default();
        for r in reminders {
            if r.is_recurring() {
                snap.recurring.push(r.clone());
            } else {
                snap.dated.entry(r.date).or_default().push(r.clone());
            }
        }
        for t in todos {
            snap.todos.entry(t.date).or_default().push(t.clone());
        }
        snap
    }

    /// Reminders active on `date`: the non-recurring bucket for that
    /// date plus every recurring rule whose occurrence predicate
    /// matches. Sorted by time of day, then creation order.
    pub fn reminders_on(&self, date: NaiveDate) -> Vec<Reminder> {
        let mut out: Vec<Reminder> = self.dated.get(&date).cloned().unwrap_or_default();
        out.extend(
            self.recurring
                .iter()
                .filter(|r| is_occurrence(r, date))
                .cloned(),
        );
        out.sort_by(|a, b| a.time.cmp(&b.time).then(a.created_at.cmp(&b.created_at)));
        out
    }

    pub fn todos_on(&self, date: NaiveDate) -> Vec<Todo> {
        let mut out = self.todos.get(&date).cloned().unwrap_or_default();
        out.sort_by_key(|t| t.created_at);
        out
    }

    /// Every todo across all dates, newest date first.
    pub fn all_todos(&self) -> Vec<Todo> {
        let mut out = Vec::new();
        for list in self.todos.values().rev() {
            let mut bucket = list.clone();
            bucket.sort_by_key(|t| t.created_at);
            out.extend(bucket);
        }
        out
    }

    /// Day numbers of the month with at least one reminder occurrence.
    /// Recurring rules are evaluated per day of the month.
    pub fn days_with_reminders(&self, year: i32, month: u32) -> HashSet<u32> {
        let mut days: HashSet<u32> = self
            .dated
            .keys()
            .filter(|d| d.year() == year && d.month() == month)
            .map(NaiveDate::day)
            .collect();

        if !self.recurring.is_empty() {
            for day in 1..=days_in_month(year, month) {
                if days.contains(&day) {
                    continue;
                }
                let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
                if self.recurring.iter().any(|r| is_occurrence(r, date)) {
                    days.insert(day);
                }
            }
        }
        days
    }

    pub fn days_with_todos(&self, year: i32, month: u32) -> HashSet<u32> {
        self.todos
            .keys()
            .filter(|d| d.year() == year && d.month() == month)
            .map(NaiveDate::day)
            .collect()
    }

    /// Case-insensitive substring search over reminder titles and
    /// descriptions and todo text, ordered by date then time.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }

        let matches_reminder = |r: &Reminder| {
            r.title.to_lowercase().contains(&term)
                || r.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&term))
        };

        let mut hits: Vec<SearchHit> = Vec::new();
        for list in self.dated.values() {
            hits.extend(
                list.iter()
                    .filter(|r| matches_reminder(r))
                    .map(|r| SearchHit::Reminder(r.clone())),
            );
        }
        hits.extend(
            self.recurring
                .iter()
                .filter(|r| matches_reminder(r))
                .map(|r| SearchHit::Recurring(r.clone())),
        );
        for list in self.todos.values() {
            hits.extend(
                list.iter()
                    .filter(|t| t.text.to_lowercase().contains(&term))
                    .map(|t| SearchHit::Todo(t.clone())),
            );
        }

        hits.sort_by(|a, b| {
            a.date()
                .cmp(&b.date())
                .then_with(|| a.sort_time().cmp(b.sort_time()))
        });
        hits
    }

    pub fn stats(&self, year: i32, month: u32) -> MonthStats {
        let mut total_todos = 0;
        let mut completed_todos = 0;
        for list in self.todos.values() {
            total_todos += list.len();
            completed_todos += list.iter().filter(|t| t.completed).count();
        }
        let completion_rate = if total_todos > 0 {
            // Rounded to the nearest whole percent.
            ((completed_todos * 100 + total_todos / 2) / total_todos) as u32
        } else {
            0
        };

        let mut month_reminders = 0;
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        let mut bump = |cat: Option<EventCategory>| {
            let cat = cat.unwrap_or_default();
            let idx = EventCategory::ALL.iter().position(|c| *c == cat).unwrap();
            *counts.entry(idx).or_insert(0) += 1;
        };

        for (date, list) in &self.dated {
            if date.year() == year && date.month() == month {
                month_reminders += list.len();
                for r in list {
                    bump(r.category);
                }
            }
        }
        // Recurring rules count once each for the distribution rather
        // than once per occurrence.
        for r in &self.recurring {
            bump(r.category);
        }

        let category_counts = EventCategory::ALL
            .iter()
            .enumerate()
            .map(|(idx, cat)| (*cat, counts.get(&idx).copied().unwrap_or(0)))
            .collect();

        MonthStats {
            total_todos,
            completed_todos,
            completion_rate,
            month_reminders,
            category_counts,
        }
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .unwrap()
    .signed_duration_since(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
    .num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reminder::RepeatFrequency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reminder(id: &str, anchor: NaiveDate, time: &str, repeat: RepeatFrequency) -> Reminder {
        Reminder {
            id: id.to_string(),
            title: format!("reminder {id}"),
            description: None,
            date: anchor,
            time: time.to_string(),
            color: "#10b981".to_string(),
            category: None,
            created_at: 0,
            repeat,
            alerts: Vec::new(),
            is_completed: false,
        }
    }

    fn todo(id: &str, d: NaiveDate, text: &str, completed: bool) -> Todo {
        Todo {
            id: id.to_string(),
            text: text.to_string(),
            completed,
            date: d,
            created_at: 0,
        }
    }

    #[test]
    fn union_of_dated_and_recurring_sorted_by_time() {
        let r1 = reminder("r1", date(2024, 3, 1), "14:00", RepeatFrequency::None);
        let r2 = reminder("r2", date(2024, 2, 1), "09:00", RepeatFrequency::Daily);
        let snap = Snapshot::build(&[r1, r2], &[]);

        let on_day = snap.reminders_on(date(2024, 3, 1));
        let ids: Vec<&str> = on_day.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r2", "r1"]); // 09:00 before 14:00

        // The recurring rule was not bucketed anywhere.
        assert!(snap.reminders_on(date(2024, 1, 31)).is_empty());
    }

    #[test]
    fn time_ties_break_by_creation_order() {
        let mut a = reminder("a", date(2024, 3, 1), "09:00", RepeatFrequency::None);
        let mut b = reminder("b", date(2024, 3, 1), "09:00", RepeatFrequency::None);
        a.created_at = 2;
        b.created_at = 1;
        let snap = Snapshot::build(&[a, b], &[]);
        let ids: Vec<String> = snap
            .reminders_on(date(2024, 3, 1))
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn month_markers_include_recurring_occurrences() {
        let weekly = reminder("w", date(2024, 1, 10), "08:00", RepeatFrequency::Weekly);
        let single = reminder("s", date(2024, 2, 14), "19:00", RepeatFrequency::None);
        let snap = Snapshot::build(&[weekly, single], &[]);

        let days = snap.days_with_reminders(2024, 2);
        // Wednesdays of February 2024 plus the single anchor.
        assert_eq!(days, HashSet::from([7, 14, 21, 28]));

        // Nothing before the weekly anchor's month.
        assert!(snap.days_with_reminders(2023, 12).is_empty());
    }

    #[test]
    fn search_matches_titles_descriptions_and_todos() {
        let mut r = reminder("r1", date(2024, 3, 5), "10:00", RepeatFrequency::None);
        r.title = "Team sync".to_string();
        let mut rec = reminder("r2", date(2024, 1, 1), "07:00", RepeatFrequency::Daily);
        rec.title = "Jog".to_string();
        rec.description = Some("morning sync with the river".to_string());
        let t = todo("t1", date(2024, 3, 4), "sync dotfiles", false);

        let snap = Snapshot::build(&[r, rec], &[t]);
        let hits = snap.search("SYNC");
        assert_eq!(hits.len(), 3);
        // Ordered by date: recurring anchor (Jan 1), todo (Mar 4), reminder (Mar 5).
        assert!(matches!(hits[0], SearchHit::Recurring(_)));
        assert!(matches!(hits[1], SearchHit::Todo(_)));
        assert!(matches!(hits[2], SearchHit::Reminder(_)));

        assert!(snap.search("   ").is_empty());
    }

    #[test]
    fn stats_count_completion_and_categories() {
        let mut work = reminder("r1", date(2024, 3, 5), "10:00", RepeatFrequency::None);
        work.category = Some(EventCategory::Work);
        let uncategorized = reminder("r2", date(2024, 3, 9), "11:00", RepeatFrequency::None);
        let outside = reminder("r3", date(2024, 4, 2), "11:00", RepeatFrequency::None);
        let mut daily = reminder("r4", date(2024, 1, 1), "06:00", RepeatFrequency::Daily);
        daily.category = Some(EventCategory::Health);

        let todos = [
            todo("t1", date(2024, 3, 1), "a", true),
            todo("t2", date(2024, 3, 2), "b", false),
            todo("t3", date(2024, 5, 2), "c", true),
        ];
        let snap = Snapshot::build(&[work, uncategorized, outside, daily], &todos);

        let stats = snap.stats(2024, 3);
        assert_eq!(stats.total_todos, 3);
        assert_eq!(stats.completed_todos, 2);
        assert_eq!(stats.completion_rate, 67); // 2/3, rounded
        assert_eq!(stats.month_reminders, 2);

        let count_of = |cat: EventCategory| {
            stats
                .category_counts
                .iter()
                .find(|(c, _)| *c == cat)
                .map(|(_, n)| *n)
                .unwrap()
        };
        assert_eq!(count_of(EventCategory::Work), 1);
        assert_eq!(count_of(EventCategory::Other), 1); // uncategorized
        assert_eq!(count_of(EventCategory::Health), 1); // recurring counts once
    }

    #[test]
    fn completion_rate_rounds_to_nearest_percent() {
        let todos = [
            todo("t1", date(2024, 3, 1), "a", true),
            todo("t2", date(2024, 3, 1), "b", false),
            todo("t3", date(2024, 3, 1), "c", false),
        ];
        let snap = Snapshot::build(&[], &todos);
        assert_eq!(snap.stats(2024, 3).completion_rate, 33); // 1/3

        let todos = [
            todo("t1", date(2024, 3, 1), "a", true),
            todo("t2", date(2024, 3, 1), "b", true),
            todo("t3", date(2024, 3, 1), "c", false),
            todo("t4", date(2024, 3, 1), "d", true),
            todo("t5", date(2024, 3, 1), "e", true),
            todo("t6", date(2024, 3, 1), "f", true),
            todo("t7", date(2024, 3, 1), "g", false),
        ];
        let snap = Snapshot::build(&[], &todos);
        assert_eq!(snap.stats(2024, 3).completion_rate, 71); // 5/7 = 71.4
    }

    #[test]
    fn all_todos_lists_newest_date_first() {
        let todos = [
            todo("t1", date(2024, 3, 1), "old", false),
            todo("t2", date(2024, 3, 9), "new", true),
            todo("t3", date(2024, 3, 4), "mid", false),
        ];
        let snap = Snapshot::build(&[], &todos);
        let ids: Vec<String> = snap.all_todos().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["t2", "t3", "t1"]);
    }
}
