pub mod preferences;
pub mod recurrence;
pub mod reminder;
pub mod snapshot;
pub mod todo;

pub use preferences::UserPreferences;
pub use recurrence::is_occurrence;
pub use reminder::{EventCategory, Reminder, RepeatFrequency};
pub use snapshot::{MonthStats, SearchHit, Snapshot};
pub use todo::Todo;
