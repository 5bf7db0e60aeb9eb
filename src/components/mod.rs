pub mod all_todos;
pub mod day_view;
pub mod month_view;
pub mod prompt;
pub mod reminder_form;
pub mod search;
pub mod stats;
pub mod week_view;

pub use all_todos::AllTodosView;
pub use day_view::DayView;
pub use month_view::MonthView;
pub use prompt::Prompt;
pub use reminder_form::ReminderForm;
pub use search::SearchView;
pub use stats::StatsView;
pub use week_view::WeekView;
