use std::collections::HashSet;

use chrono::{Datelike, Duration, Local, NaiveDate};
use color_eyre::Result;
use uuid::Uuid;

use crate::components::reminder_form::ReminderFormState;
use crate::model::{Reminder, SearchHit, Snapshot, Todo, UserPreferences};
use crate::notify::AlertClock;
use crate::store::{Document, Store};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Month,
    Week,
    Day,
}

/// What the day panel cursor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySelection {
    Reminder(usize),
    Todo(usize),
}

/// Modal state; at most one overlay is active.
pub enum Overlay {
    Help,
    ReminderForm(ReminderFormState),
    TodoInput(String),
    Search {
        query: String,
        results: Vec<SearchHit>,
        selected: usize,
    },
    Stats,
    Detail(DaySelection),
    AllTodos {
        selected: usize,
    },
}

/// Inverse of the last mutation, for undo.
enum HistoryItem {
    AddedReminder(String),
    UpdatedReminder(Reminder),
    DeletedReminder(Reminder),
    AddedTodo(String),
    UpdatedTodo(Todo),
    DeletedTodo(Todo),
}

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub overlay: Option<Overlay>,
    pub status_message: Option<String>,

    // Per-date caches rebuilt from the snapshot.
    pub day_reminders: Vec<Reminder>,
    pub day_todos: Vec<Todo>,
    pub day_cursor: usize,
    pub day_scroll: usize,
    pub days_with_reminders: HashSet<u32>,
    pub days_with_todos: HashSet<u32>,

    pub snapshot: Snapshot,
    store: Store,
    doc: Document,
    history: Vec<HistoryItem>,
    alerts: AlertClock,
}

impl App {
    pub fn new() -> Result<Self> {
        Self::with_store(Store::open_default()?)
    }

    pub fn with_store(store: Store) -> Result<Self> {
        let doc = store.load()?;
        let today = Local::now().date_naive();

        let mut app = Self {
            running: true,
            view_mode: ViewMode::Month,
            selected_date: today,
            today,
            overlay: None,
            status_message: None,
            day_reminders: Vec::new(),
            day_todos: Vec::new(),
            day_cursor: 0,
            day_scroll: 0,
            days_with_reminders: HashSet::new(),
            days_with_todos: HashSet::new(),
            snapshot: Snapshot::default(),
            store,
            doc,
            history: Vec::new(),
            alerts: AlertClock::new(),
        };
        app.rebuild();
        Ok(app)
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.doc.preferences
    }

    /// Rebuild the snapshot and every derived cache after any change to
    /// the document or the selected date.
    fn rebuild(&mut self) {
        self.snapshot = Snapshot::build(&self.doc.reminders, &self.doc.todos);
        self.refresh_day();
        self.refresh_month_markers();
    }

    fn refresh_day(&mut self) {
        self.day_reminders = self.snapshot.reminders_on(self.selected_date);
        self.day_todos = self.snapshot.todos_on(self.selected_date);
        let count = self.day_item_count();
        if count == 0 {
            self.day_cursor = 0;
        } else if self.day_cursor >= count {
            self.day_cursor = count - 1;
        }
        self.day_scroll = self.day_scroll.min(self.day_cursor);
    }

    fn refresh_month_markers(&mut self) {
        let year = self.selected_date.year();
        let month = self.selected_date.month();
        self.days_with_reminders = self.snapshot.days_with_reminders(year, month);
        self.days_with_todos = self.snapshot.days_with_todos(year, month);
    }

    // --- Day panel cursor ---

    pub fn day_item_count(&self) -> usize {
        self.day_reminders.len() + self.day_todos.len()
    }

    pub fn day_selection(&self) -> Option<DaySelection> {
        if self.day_cursor < self.day_reminders.len() {
            Some(DaySelection::Reminder(self.day_cursor))
        } else if self.day_cursor < self.day_item_count() {
            Some(DaySelection::Todo(self.day_cursor - self.day_reminders.len()))
        } else {
            None
        }
    }

    pub fn cursor_down(&mut self) {
        let count = self.day_item_count();
        if count > 0 && self.day_cursor + 1 < count {
            self.day_cursor += 1;
        }
        // Rough follow: keep roughly a panel's worth of items above.
        self.day_scroll = self.day_cursor.saturating_sub(12);
    }

    pub fn cursor_up(&mut self) {
        self.day_cursor = self.day_cursor.saturating_sub(1);
        self.day_scroll = self.day_scroll.min(self.day_cursor);
    }

    // --- Navigation ---

    pub fn next_day(&mut self) {
        self.selected_date = self.selected_date.succ_opt().unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn prev_day(&mut self) {
        self.selected_date = self.selected_date.pred_opt().unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn next_week(&mut self) {
        self.selected_date += Duration::weeks(1);
        self.on_date_changed();
    }

    pub fn prev_week(&mut self) {
        self.selected_date -= Duration::weeks(1);
        self.on_date_changed();
    }

    pub fn next_month(&mut self) {
        self.shift_month(1);
    }

    pub fn prev_month(&mut self) {
        self.shift_month(-1);
    }

    fn shift_month(&mut self, delta: i32) {
        let month0 = self.selected_date.month() as i32 - 1 + delta;
        let year = self.selected_date.year() + month0.div_euclid(12);
        let month = (month0.rem_euclid(12) + 1) as u32;
        let day = self
            .selected_date
            .day()
            .min(crate::model::snapshot::days_in_month(year, month));
        self.selected_date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        self.on_date_changed();
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.selected_date = self.today;
        self.on_date_changed();
    }

    pub fn jump_to(&mut self, date: NaiveDate) {
        self.selected_date = date;
        self.overlay = None;
        self.on_date_changed();
    }

    fn on_date_changed(&mut self) {
        self.day_cursor = 0;
        self.day_scroll = 0;
        self.refresh_day();
        self.refresh_month_markers();
    }

    pub fn week_start(&self) -> NaiveDate {
        let back = self.selected_date.weekday().num_days_from_sunday();
        self.selected_date - Duration::days(back as i64)
    }

    // --- Reminder / todo mutations ---

    pub fn open_reminder_form(&mut self) {
        self.overlay = Some(Overlay::ReminderForm(ReminderFormState::new(
            self.selected_date,
        )));
    }

    /// Open the form pre-filled with the selected reminder.
    pub fn edit_selected(&mut self) {
        if let Some(DaySelection::Reminder(idx)) = self.day_selection() {
            if let Some(rem) = self.day_reminders.get(idx) {
                self.overlay = Some(Overlay::ReminderForm(ReminderFormState::edit(rem)));
            }
        }
    }

    pub fn submit_reminder_form(&mut self, form: &ReminderFormState) {
        let (id, created_at, editing) = match &form.editing {
            Some((id, created_at)) => (id.clone(), *created_at, true),
            None => (Uuid::new_v4().to_string(), Local::now().timestamp(), false),
        };
        let Some(mut reminder) = form.to_reminder(id, created_at) else {
            self.status_message = Some("Invalid reminder input".to_string());
            return;
        };

        if editing {
            // Completion state is managed outside the form.
            if let Some(prev) = self.doc.reminders.iter().find(|r| r.id == reminder.id) {
                reminder.is_completed = prev.is_completed;
            }
            match self.store.update_reminder(&mut self.doc, reminder) {
                Ok(prev) => {
                    self.history.push(HistoryItem::UpdatedReminder(prev));
                    self.status_message = Some("Reminder updated".to_string());
                }
                Err(e) => self.status_message = Some(format!("Save failed: {e}")),
            }
        } else {
            let id = reminder.id.clone();
            match self.store.add_reminder(&mut self.doc, reminder) {
                Ok(()) => {
                    self.history.push(HistoryItem::AddedReminder(id));
                    self.status_message = Some("Reminder added".to_string());
                }
                Err(e) => self.status_message = Some(format!("Save failed: {e}")),
            }
        }
        self.overlay = None;
        self.rebuild();
    }

    pub fn open_todo_input(&mut self) {
        self.overlay = Some(Overlay::TodoInput(String::new()));
    }

    pub fn submit_todo_input(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            self.overlay = None;
            return;
        }
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed: false,
            date: self.selected_date,
            created_at: Local::now().timestamp(),
        };
        let id = todo.id.clone();
        match self.store.add_todo(&mut self.doc, todo) {
            Ok(()) => {
                self.history.push(HistoryItem::AddedTodo(id));
                self.status_message = Some("Todo added".to_string());
            }
            Err(e) => self.status_message = Some(format!("Save failed: {e}")),
        }
        self.overlay = None;
        self.rebuild();
    }

    /// Toggle completion of the selected reminder or todo.
    pub fn toggle_selected(&mut self) {
        match self.day_selection() {
            Some(DaySelection::Reminder(idx)) => {
                let Some(mut rem) = self.day_reminders.get(idx).cloned() else {
                    return;
                };
                rem.is_completed = !rem.is_completed;
                match self.store.update_reminder(&mut self.doc, rem) {
                    Ok(prev) => self.history.push(HistoryItem::UpdatedReminder(prev)),
                    Err(e) => self.status_message = Some(format!("Save failed: {e}")),
                }
            }
            Some(DaySelection::Todo(idx)) => {
                let Some(mut todo) = self.day_todos.get(idx).cloned() else {
                    return;
                };
                todo.completed = !todo.completed;
                match self.store.update_todo(&mut self.doc, todo) {
                    Ok(prev) => self.history.push(HistoryItem::UpdatedTodo(prev)),
                    Err(e) => self.status_message = Some(format!("Save failed: {e}")),
                }
            }
            None => return,
        }
        self.rebuild();
    }

    pub fn delete_selected(&mut self) {
        match self.day_selection() {
            Some(DaySelection::Reminder(idx)) => {
                let Some(id) = self.day_reminders.get(idx).map(|r| r.id.clone()) else {
                    return;
                };
                match self.store.delete_reminder(&mut self.doc, &id) {
                    Ok(removed) => {
                        self.history.push(HistoryItem::DeletedReminder(removed));
                        self.status_message = Some("Reminder deleted (u to undo)".to_string());
                    }
                    Err(e) => self.status_message = Some(format!("Delete failed: {e}")),
                }
            }
            Some(DaySelection::Todo(idx)) => {
                let Some(id) = self.day_todos.get(idx).map(|t| t.id.clone()) else {
                    return;
                };
                match self.store.delete_todo(&mut self.doc, &id) {
                    Ok(removed) => {
                        self.history.push(HistoryItem::DeletedTodo(removed));
                        self.status_message = Some("Todo deleted (u to undo)".to_string());
                    }
                    Err(e) => self.status_message = Some(format!("Delete failed: {e}")),
                }
            }
            None => return,
        }
        self.rebuild();
    }

    /// Revert the most recent mutation.
    pub fn undo(&mut self) {
        let Some(item) = self.history.pop() else {
            self.status_message = Some("Nothing to undo".to_string());
            return;
        };
        let result = match item {
            HistoryItem::AddedReminder(id) => self
                .store
                .delete_reminder(&mut self.doc, &id)
                .map(|_| ()),
            HistoryItem::UpdatedReminder(prev) => self
                .store
                .update_reminder(&mut self.doc, prev)
                .map(|_| ()),
            HistoryItem::DeletedReminder(rem) => self.store.add_reminder(&mut self.doc, rem),
            HistoryItem::AddedTodo(id) => self.store.delete_todo(&mut self.doc, &id).map(|_| ()),
            HistoryItem::UpdatedTodo(prev) => {
                self.store.update_todo(&mut self.doc, prev).map(|_| ())
            }
            HistoryItem::DeletedTodo(todo) => self.store.add_todo(&mut self.doc, todo),
        };
        self.status_message = Some(match result {
            Ok(()) => "Undone".to_string(),
            Err(e) => format!("Undo failed: {e}"),
        });
        self.rebuild();
    }

    // --- Search ---

    pub fn open_search(&mut self) {
        self.overlay = Some(Overlay::Search {
            query: String::new(),
            results: Vec::new(),
            selected: 0,
        });
    }

    /// Re-run the query after an edit to the search input.
    pub fn refresh_search(&mut self) {
        if let Some(Overlay::Search {
            query,
            results,
            selected,
        }) = &mut self.overlay
        {
            *results = self.snapshot.search(query);
            *selected = (*selected).min(results.len().saturating_sub(1));
        }
    }

    // --- All-todos overlay ---

    pub fn open_all_todos(&mut self) {
        self.overlay = Some(Overlay::AllTodos { selected: 0 });
    }

    pub fn all_todos(&self) -> Vec<Todo> {
        self.snapshot.all_todos()
    }

    fn all_todos_selected(&self) -> Option<Todo> {
        let Some(Overlay::AllTodos { selected }) = &self.overlay else {
            return None;
        };
        self.all_todos().into_iter().nth(*selected)
    }

    pub fn all_todos_toggle(&mut self) {
        let Some(mut todo) = self.all_todos_selected() else {
            return;
        };
        todo.completed = !todo.completed;
        match self.store.update_todo(&mut self.doc, todo) {
            Ok(prev) => self.history.push(HistoryItem::UpdatedTodo(prev)),
            Err(e) => self.status_message = Some(format!("Save failed: {e}")),
        }
        self.rebuild();
    }

    pub fn all_todos_delete(&mut self) {
        let Some(todo) = self.all_todos_selected() else {
            return;
        };
        match self.store.delete_todo(&mut self.doc, &todo.id) {
            Ok(removed) => {
                self.history.push(HistoryItem::DeletedTodo(removed));
                self.status_message = Some("Todo deleted (u to undo)".to_string());
            }
            Err(e) => self.status_message = Some(format!("Delete failed: {e}")),
        }
        self.rebuild();
        let count = self.all_todos().len();
        if let Some(Overlay::AllTodos { selected }) = &mut self.overlay {
            *selected = (*selected).min(count.saturating_sub(1));
        }
    }

    /// Close the overlay and jump to the selected todo's date.
    pub fn all_todos_jump(&mut self) {
        if let Some(todo) = self.all_todos_selected() {
            self.jump_to(todo.date);
        }
    }

    // --- Preferences / alerts ---

    pub fn toggle_notifications(&mut self) {
        let mut prefs = self.doc.preferences.clone();
        prefs.notifications = !prefs.notifications;
        let enabled = prefs.notifications;
        match self.store.update_preferences(&mut self.doc, prefs) {
            Ok(()) => {
                self.status_message = Some(
                    if enabled {
                        "Alerts on"
                    } else {
                        "Alerts off"
                    }
                    .to_string(),
                );
            }
            Err(e) => self.status_message = Some(format!("Save failed: {e}")),
        }
    }

    /// Poll-timeout tick: roll the calendar over midnight and fire due
    /// alert offsets.
    pub fn tick(&mut self) {
        let now = Local::now();
        let today = now.date_naive();
        if today != self.today {
            self.today = today;
            self.refresh_month_markers();
        }

        if !self.doc.preferences.notifications {
            return;
        }
        let fired = self.alerts.check(&self.snapshot, now.naive_local());
        if !fired.is_empty() {
            self.status_message = Some(fired.join("  |  "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RepeatFrequency;

    fn test_app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path().join("data.json"));
        let app = App::with_store(store).unwrap();
        (dir, app)
    }

    fn submit_reminder(app: &mut App, title: &str, date: NaiveDate, repeat: RepeatFrequency) {
        let mut form = ReminderFormState::new(date);
        form.title = title.to_string();
        form.repeat = repeat;
        app.submit_reminder_form(&form);
    }

    #[test]
    fn added_reminder_appears_in_day_panel() {
        let (_dir, mut app) = test_app();
        let date = app.selected_date;
        submit_reminder(&mut app, "Dentist", date, RepeatFrequency::None);

        assert_eq!(app.day_reminders.len(), 1);
        assert_eq!(app.day_reminders[0].title, "Dentist");
        assert!(app.days_with_reminders.contains(&date.day()));
    }

    #[test]
    fn recurring_reminder_shows_on_later_matching_dates() {
        let (_dir, mut app) = test_app();
        let date = app.selected_date;
        submit_reminder(&mut app, "Standup", date, RepeatFrequency::Daily);

        app.next_day();
        assert_eq!(app.day_reminders.len(), 1);
        app.prev_day();
        app.prev_day();
        assert!(app.day_reminders.is_empty()); // never before the anchor
    }

    #[test]
    fn toggle_and_undo_round_trip() {
        let (_dir, mut app) = test_app();
        let date = app.selected_date;
        submit_reminder(&mut app, "Dentist", date, RepeatFrequency::None);

        app.day_cursor = 0;
        app.toggle_selected();
        assert!(app.day_reminders[0].is_completed);

        app.undo();
        assert!(!app.day_reminders[0].is_completed);
    }

    #[test]
    fn delete_then_undo_restores_the_reminder() {
        let (_dir, mut app) = test_app();
        let date = app.selected_date;
        submit_reminder(&mut app, "Dentist", date, RepeatFrequency::None);

        app.day_cursor = 0;
        app.delete_selected();
        assert!(app.day_reminders.is_empty());

        app.undo();
        assert_eq!(app.day_reminders.len(), 1);
        assert_eq!(app.day_reminders[0].title, "Dentist");
    }

    #[test]
    fn undo_of_add_removes_it_again() {
        let (_dir, mut app) = test_app();
        let date = app.selected_date;
        app.submit_todo_input("water plants");
        assert_eq!(app.day_todos.len(), 1);
        assert_eq!(app.day_todos[0].date, date);

        app.undo();
        assert!(app.day_todos.is_empty());
    }

    #[test]
    fn day_selection_spans_reminders_then_todos() {
        let (_dir, mut app) = test_app();
        let date = app.selected_date;
        submit_reminder(&mut app, "Dentist", date, RepeatFrequency::None);
        app.submit_todo_input("water plants");

        app.day_cursor = 0;
        assert_eq!(app.day_selection(), Some(DaySelection::Reminder(0)));
        app.cursor_down();
        assert_eq!(app.day_selection(), Some(DaySelection::Todo(0)));
        app.cursor_down(); // clamped at the end
        assert_eq!(app.day_selection(), Some(DaySelection::Todo(0)));
    }

    #[test]
    fn month_shift_clamps_the_day() {
        let (_dir, mut app) = test_app();
        app.jump_to(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        app.next_month();
        assert_eq!(app.selected_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        app.prev_month();
        assert_eq!(app.selected_date, NaiveDate::from_ymd_opt(2024, 1, 29).unwrap());

        app.jump_to(NaiveDate::from_ymd_opt(2024, 12, 15).unwrap());
        app.next_month();
        assert_eq!(app.selected_date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn all_todos_overlay_toggles_and_deletes_across_dates() {
        let (_dir, mut app) = test_app();
        app.submit_todo_input("water plants");
        app.next_day();
        app.submit_todo_input("call plumber");

        app.open_all_todos();
        let todos = app.all_todos();
        assert_eq!(todos.len(), 2);
        // Newest date first.
        assert_eq!(todos[0].text, "call plumber");

        app.all_todos_toggle();
        assert!(app.all_todos()[0].completed);

        app.all_todos_delete();
        let remaining = app.all_todos();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].text, "water plants");
        // Selection stays in bounds after the delete.
        assert!(matches!(
            app.overlay,
            Some(Overlay::AllTodos { selected: 0 })
        ));

        app.undo();
        assert_eq!(app.all_todos().len(), 2);
    }

    #[test]
    fn all_todos_jump_lands_on_the_todo_date() {
        let (_dir, mut app) = test_app();
        let first = app.selected_date;
        app.submit_todo_input("water plants");
        app.next_day();
        app.next_day();

        app.open_all_todos();
        app.all_todos_jump();
        assert_eq!(app.selected_date, first);
        assert!(app.overlay.is_none());
    }

    #[test]
    fn search_overlay_tracks_the_snapshot() {
        let (_dir, mut app) = test_app();
        let date = app.selected_date;
        submit_reminder(&mut app, "Quarterly review", date, RepeatFrequency::None);

        app.open_search();
        if let Some(Overlay::Search { query, .. }) = &mut app.overlay {
            query.push_str("review");
        }
        app.refresh_search();
        let Some(Overlay::Search { results, .. }) = &app.overlay else {
            panic!("search overlay gone");
        };
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title(), "Quarterly review");
    }
}
