use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dated todo item. Unlike reminders, todos never recur.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub date: NaiveDate,
    pub created_at: i64,
}
