use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{Reminder, Snapshot};
use crate::theme;

const HOUR_START: u32 = 6;
const HOUR_END: u32 = 23;

pub struct WeekView;

impl WeekView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        week_start: NaiveDate,
        snapshot: &Snapshot,
    ) {
        let block = Block::default()
            .title(format!(" Week of {} ", week_start.format("%b %d, %Y")))
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 10 || inner.height < 3 {
            return;
        }

        let inner_w = inner.width as usize;
        let inner_h = inner.height as usize;

        // One occurrence query per visible day.
        let day_reminders: Vec<Vec<Reminder>> = (0..7)
            .map(|offset| snapshot.reminders_on(week_start + chrono::Duration::days(offset)))
            .collect();

        // Time label column width
        let time_col_w: u16 = if inner_w >= 70 { 6 } else { 4 };
        let day_cols_w = inner.width.saturating_sub(time_col_w);
        let col_w = (day_cols_w / 7).max(1);

        let mut col_constraints = vec![Constraint::Length(time_col_w)];
        for _ in 0..7 {
            col_constraints.push(Constraint::Length(col_w));
        }
        col_constraints.push(Constraint::Min(0)); // absorb remainder

        let cols = Layout::horizontal(col_constraints).split(inner);

        // Reserve 1 row for day headers
        let content_rows = inner_h.saturating_sub(1);
        let total_hours = (HOUR_END - HOUR_START) as usize;
        let rows_per_hour = (content_rows / total_hours).max(1);
        let visible_hours = (content_rows / rows_per_hour).min(total_hours);

        let mut row_constraints = vec![Constraint::Length(1)]; // day header
        for _ in 0..visible_hours {
            row_constraints.push(Constraint::Length(rows_per_hour as u16));
        }
        row_constraints.push(Constraint::Min(0));

        let rows = Layout::vertical(row_constraints).split(inner);

        // Day headers
        for day_offset in 0..7u32 {
            let date = week_start + chrono::Duration::days(day_offset as i64);
            let col_idx = (day_offset + 1) as usize;
            if col_idx >= cols.len() {
                break;
            }

            let day_label = if col_w >= 10 {
                format!("{}", date.format("%a %d"))
            } else if col_w >= 5 {
                format!("{}", date.format("%a"))
            } else {
                format!("{}", date.format("%d"))
            };

            let style = if date == today && date == selected_date {
                Style::default()
                    .fg(ratatui::style::Color::Black)
                    .bg(ratatui::style::Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if date == selected_date {
                theme::current().selected
            } else if date == today {
                theme::current().today
            } else {
                theme::current().header
            };

            let label = Paragraph::new(Line::from(Span::styled(
                format!("{:^width$}", day_label, width = col_w as usize),
                style,
            )));
            frame.render_widget(label, cols[col_idx].intersection(rows[0]));
        }

        // Time labels and reminder cells
        for hour_idx in 0..visible_hours {
            let hour = HOUR_START + hour_idx as u32;
            let row_idx = hour_idx + 1;
            if row_idx >= rows.len() {
                break;
            }

            let time_label = if time_col_w >= 6 {
                format!("{:>2}:00 ", hour)
            } else {
                format!("{:>2} ", hour)
            };
            let time_para = Paragraph::new(Line::from(Span::styled(
                time_label,
                theme::current().dim,
            )));
            frame.render_widget(time_para, cols[0].intersection(rows[row_idx]));

            for day_offset in 0..7usize {
                let col_idx = day_offset + 1;
                if col_idx >= cols.len() {
                    break;
                }

                let cell_area = cols[col_idx].intersection(rows[row_idx]);
                if cell_area.width == 0 || cell_area.height == 0 {
                    continue;
                }

                // Reminders before the visible range pile into the first
                // hour row so nothing disappears.
                let cell_reminders: Vec<&Reminder> = day_reminders[day_offset]
                    .iter()
                    .filter(|r| {
                        let rem_hour = reminder_hour(r);
                        rem_hour == hour || (hour == HOUR_START && rem_hour < HOUR_START)
                    })
                    .collect();

                if let Some(rem) = cell_reminders.first() {
                    let max_title_len = cell_area.width as usize;
                    let mut text = if cell_reminders.len() > 1 {
                        format!("{} +{}", rem.title, cell_reminders.len() - 1)
                    } else {
                        rem.title.clone()
                    };
                    text = text.chars().take(max_title_len).collect();
                    let display = format!("{:<width$}", text, width = max_title_len);

                    let bg = theme::parse_color(&rem.color)
                        .unwrap_or_else(|| theme::current().category(rem.category));
                    let style = Style::default().fg(ratatui::style::Color::Black).bg(bg);

                    let para = Paragraph::new(Line::from(Span::styled(display, style)));
                    frame.render_widget(para, cell_area);
                }
            }
        }
    }
}

fn reminder_hour(reminder: &Reminder) -> u32 {
    reminder
        .time
        .split(':')
        .next()
        .and_then(|h| h.parse().ok())
        .unwrap_or(0)
}
