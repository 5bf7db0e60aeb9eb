use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How often a reminder repeats after its anchor date.
///
/// Closed set on purpose: an unknown value in stored data is a
/// deserialization error, not a silently-dead rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatFrequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatFrequency {
    pub fn is_recurring(self) -> bool {
        self != RepeatFrequency::None
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatFrequency::None => "none",
            RepeatFrequency::Daily => "daily",
            RepeatFrequency::Weekly => "weekly",
            RepeatFrequency::Monthly => "monthly",
            RepeatFrequency::Yearly => "yearly",
        }
    }

    /// Cycle through variants, used by the form's repeat field.
    pub fn next(self) -> Self {
        match self {
            RepeatFrequency::None => RepeatFrequency::Daily,
            RepeatFrequency::Daily => RepeatFrequency::Weekly,
            RepeatFrequency::Weekly => RepeatFrequency::Monthly,
            RepeatFrequency::Monthly => RepeatFrequency::Yearly,
            RepeatFrequency::Yearly => RepeatFrequency::None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Work,
    Personal,
    Study,
    Health,
    Travel,
    #[default]
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 6] = [
        EventCategory::Work,
        EventCategory::Personal,
        EventCategory::Study,
        EventCategory::Health,
        EventCategory::Travel,
        EventCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventCategory::Work => "work",
            EventCategory::Personal => "personal",
            EventCategory::Study => "study",
            EventCategory::Health => "health",
            EventCategory::Travel => "travel",
            EventCategory::Other => "other",
        }
    }

    pub fn next(self) -> Self {
        match self {
            EventCategory::Work => EventCategory::Personal,
            EventCategory::Personal => EventCategory::Study,
            EventCategory::Study => EventCategory::Health,
            EventCategory::Health => EventCategory::Travel,
            EventCategory::Travel => EventCategory::Other,
            EventCategory::Other => EventCategory::Work,
        }
    }
}

/// A calendar reminder. `date` is the anchor: the first date the
/// reminder can occur on. `time` stays a zero-padded `HH:MM` string so
/// that sorting by it lexicographically is sorting chronologically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EventCategory>,
    pub created_at: i64,
    #[serde(default)]
    pub repeat: RepeatFrequency,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<u32>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Reminder {
    pub fn is_recurring(&self) -> bool {
        self.repeat.is_recurring()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_round_trips_as_lowercase() {
        let json = serde_json::to_string(&RepeatFrequency::Monthly).unwrap();
        assert_eq!(json, "\"monthly\"");
        let back: RepeatFrequency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RepeatFrequency::Monthly);
    }

    #[test]
    fn unknown_repeat_is_an_error_not_none() {
        let result: Result<RepeatFrequency, _> = serde_json::from_str("\"fortnightly\"");
        assert!(result.is_err());
    }

    #[test]
    fn reminder_defaults_missing_fields() {
        let json = r##"{
            "id": "a1",
            "title": "Dentist",
            "date": "2024-05-02",
            "time": "09:30",
            "color": "#3b82f6",
            "createdAt": 1714000000
        }"##;
        let r: Reminder = serde_json::from_str(json).unwrap();
        assert_eq!(r.repeat, RepeatFrequency::None);
        assert!(r.alerts.is_empty());
        assert!(!r.is_completed);
        assert!(r.category.is_none());
    }
}
