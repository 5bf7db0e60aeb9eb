use chrono::{NaiveDate, NaiveTime};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::model::{EventCategory, Reminder, RepeatFrequency};
use crate::theme;

/// Palette offered by the form's color field.
pub const COLOR_CHOICES: [&str; 6] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Title,
    Date,
    Time,
    Description,
    Category,
    Repeat,
    Alerts,
    Color,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Date,
            FormField::Date => FormField::Time,
            FormField::Time => FormField::Description,
            FormField::Description => FormField::Category,
            FormField::Category => FormField::Repeat,
            FormField::Repeat => FormField::Alerts,
            FormField::Alerts => FormField::Color,
            FormField::Color => FormField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Color,
            FormField::Date => FormField::Title,
            FormField::Time => FormField::Date,
            FormField::Description => FormField::Time,
            FormField::Category => FormField::Description,
            FormField::Repeat => FormField::Category,
            FormField::Alerts => FormField::Repeat,
            FormField::Color => FormField::Alerts,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReminderFormState {
    /// `(id, created_at)` of the reminder being edited; `None` for a
    /// new reminder.
    pub editing: Option<(String, i64)>,
    pub title: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub category: Option<EventCategory>,
    pub repeat: RepeatFrequency,
    /// Comma-separated minutes-before offsets, e.g. "15,60".
    pub alerts: String,
    pub color_index: usize,
    pub active_field: FormField,
}

impl ReminderFormState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            editing: None,
            title: String::new(),
            date: date.format("%Y-%m-%d").to_string(),
            time: "09:00".to_string(),
            description: String::new(),
            category: None,
            repeat: RepeatFrequency::None,
            alerts: String::new(),
            color_index: 0,
            active_field: FormField::Title,
        }
    }

    pub fn edit(reminder: &Reminder) -> Self {
        let color_index = COLOR_CHOICES
            .iter()
            .position(|c| *c == reminder.color)
            .unwrap_or(0);
        Self {
            editing: Some((reminder.id.clone(), reminder.created_at)),
            title: reminder.title.clone(),
            date: reminder.date.format("%Y-%m-%d").to_string(),
            time: reminder.time.clone(),
            description: reminder.description.clone().unwrap_or_default(),
            category: reminder.category,
            repeat: reminder.repeat,
            alerts: reminder
                .alerts
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(","),
            color_index,
            active_field: FormField::Title,
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::Title => self.title.push(c),
            FormField::Date => self.date.push(c),
            FormField::Time => self.time.push(c),
            FormField::Description => self.description.push(c),
            FormField::Alerts => self.alerts.push(c),
            FormField::Category | FormField::Repeat | FormField::Color => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Date => {
                self.date.pop();
            }
            FormField::Time => {
                self.time.pop();
            }
            FormField::Description => {
                self.description.pop();
            }
            FormField::Alerts => {
                self.alerts.pop();
            }
            FormField::Category | FormField::Repeat | FormField::Color => {}
        }
    }

    /// Space cycles the value of the non-text fields.
    pub fn cycle(&mut self) {
        match self.active_field {
            FormField::Category => {
                self.category = match self.category {
                    None => Some(EventCategory::Work),
                    Some(EventCategory::Other) => None,
                    Some(cat) => Some(cat.next()),
                };
            }
            FormField::Repeat => self.repeat = self.repeat.next(),
            FormField::Color => {
                self.color_index = (self.color_index + 1) % COLOR_CHOICES.len();
            }
            _ => {}
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    pub fn parsed_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.time.trim(), "%H:%M").ok()
    }

    pub fn parsed_alerts(&self) -> Option<Vec<u32>> {
        let trimmed = self.alerts.trim();
        if trimmed.is_empty() {
            return Some(Vec::new());
        }
        trimmed
            .split(',')
            .map(|part| part.trim().parse::<u32>().ok())
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
            && self.parsed_date().is_some()
            && self.parsed_time().is_some()
            && self.parsed_alerts().is_some()
    }

    /// Build the reminder this form describes. The time string is
    /// re-rendered through chrono so it is always zero-padded `HH:MM`.
    pub fn to_reminder(&self, id: String, created_at: i64) -> Option<Reminder> {
        let date = self.parsed_date()?;
        let time = self.parsed_time()?;
        let alerts = self.parsed_alerts()?;
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        let description = self.description.trim();
        Some(Reminder {
            id,
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            date,
            time: time.format("%H:%M").to_string(),
            color: COLOR_CHOICES[self.color_index % COLOR_CHOICES.len()].to_string(),
            category: self.category,
            created_at,
            repeat: self.repeat,
            alerts,
            is_completed: false,
        })
    }
}

pub struct ReminderForm;

impl ReminderForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &ReminderFormState) {
        let form_w = area.width.min(54).max(32);
        let form_h = area.height.min(14).max(12);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w, form_h);

        frame.render_widget(Clear, form_area);

        let title = if state.editing.is_some() {
            " Edit Reminder "
        } else {
            " New Reminder "
        };
        let block = Block::default()
            .title(title)
            .title_style(
                Style::default()
                    .fg(ratatui::style::Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ratatui::style::Color::Green));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // date
            Constraint::Length(1), // time
            Constraint::Length(1), // description
            Constraint::Length(1), // category
            Constraint::Length(1), // repeat
            Constraint::Length(1), // alerts
            Constraint::Length(1), // color
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = state.active_field;
        render_field(frame, rows[0], "Title:", &state.title, active == FormField::Title);
        render_field(frame, rows[1], "Date:", &state.date, active == FormField::Date);
        render_field(frame, rows[2], "Time:", &state.time, active == FormField::Time);
        render_field(
            frame,
            rows[3],
            "Notes:",
            &state.description,
            active == FormField::Description,
        );

        let category = state
            .category
            .map(EventCategory::label)
            .unwrap_or("(none)");
        render_field(frame, rows[4], "Cat:", category, active == FormField::Category);
        render_field(
            frame,
            rows[5],
            "Repeat:",
            state.repeat.label(),
            active == FormField::Repeat,
        );
        render_field(frame, rows[6], "Alerts:", &state.alerts, active == FormField::Alerts);

        // Color swatch plus its hex value.
        let color_hex = COLOR_CHOICES[state.color_index % COLOR_CHOICES.len()];
        let swatch_style = theme::parse_color(color_hex)
            .map(|c| Style::default().bg(c))
            .unwrap_or_default();
        let color_line = Line::from(vec![
            Span::styled(format!("{:<8}", "Color:"), theme::current().dim),
            Span::styled("  ", swatch_style),
            Span::styled(
                format!(" {}{}", color_hex, if active == FormField::Color { "_" } else { "" }),
                if active == FormField::Color {
                    Style::default().fg(ratatui::style::Color::Cyan)
                } else {
                    Style::default()
                },
            ),
        ]);
        frame.render_widget(Paragraph::new(color_line), rows[7]);

        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme::current().dim),
            Span::styled("Space", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cycle ", theme::current().dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", theme::current().dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme::current().dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[9]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };
    let style = if active {
        Style::default().fg(ratatui::style::Color::Cyan)
    } else {
        Style::default()
    };

    let spans = vec![
        Span::styled(format!("{:<8}", label), theme::current().dim),
        Span::styled(format!("{}{}", value, cursor), style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_normalized_reminder() {
        let mut form = ReminderFormState::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        form.title = "  Dentist ".to_string();
        form.time = "9:05".to_string();
        form.alerts = "15, 60".to_string();
        form.repeat = RepeatFrequency::Monthly;

        let r = form.to_reminder("id1".to_string(), 42).unwrap();
        assert_eq!(r.title, "Dentist");
        assert_eq!(r.time, "09:05"); // zero-padded
        assert_eq!(r.alerts, vec![15, 60]);
        assert_eq!(r.repeat, RepeatFrequency::Monthly);
        assert!(r.description.is_none());
    }

    #[test]
    fn rejects_bad_input() {
        let mut form = ReminderFormState::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        form.title = "x".to_string();
        form.date = "2024-13-01".to_string();
        assert!(!form.is_valid());

        form.date = "2024-03-01".to_string();
        form.alerts = "15,soon".to_string();
        assert!(!form.is_valid());

        form.alerts.clear();
        form.title.clear();
        assert!(!form.is_valid());
    }

    #[test]
    fn category_cycles_through_none() {
        let mut form = ReminderFormState::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        form.active_field = FormField::Category;
        assert!(form.category.is_none());
        for _ in 0..EventCategory::ALL.len() {
            form.cycle();
            assert!(form.category.is_some());
        }
        form.cycle();
        assert!(form.category.is_none());
    }
}
