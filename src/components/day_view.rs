use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::DaySelection;
use crate::model::{Reminder, Todo};
use crate::theme;

pub struct DayView;

impl DayView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        reminders: &[Reminder],
        todos: &[Todo],
        cursor: Option<DaySelection>,
        scroll: usize,
    ) {
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let mut counts = Vec::new();
        if !reminders.is_empty() {
            let n = reminders.len();
            counts.push(format!("{} reminder{}", n, if n == 1 { "" } else { "s" }));
        }
        if !todos.is_empty() {
            let n = todos.len();
            counts.push(format!("{} todo{}", n, if n == 1 { "" } else { "s" }));
        }
        let count_str = if counts.is_empty() {
            String::new()
        } else {
            format!(" {} ", counts.join(", "))
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::current().header)
            .title_bottom(Line::from(Span::styled(count_str, theme::current().dim)))
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        if reminders.is_empty() && todos.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("Nothing scheduled").style(theme::current().dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let mut items: Vec<ListItem> = Vec::new();

        if !reminders.is_empty() {
            items.push(ListItem::new(Line::from(Span::styled(
                "Reminders",
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ))));
            for (i, rem) in reminders.iter().enumerate() {
                let selected = cursor == Some(DaySelection::Reminder(i));
                items.push(format_reminder(rem, inner_w, selected));
            }
        }

        if !todos.is_empty() {
            if !reminders.is_empty() {
                items.push(ListItem::new(Line::from("")));
            }
            items.push(ListItem::new(Line::from(Span::styled(
                "Todos",
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ))));
            for (i, todo) in todos.iter().enumerate() {
                let selected = cursor == Some(DaySelection::Todo(i));
                items.push(format_todo(todo, selected));
            }
        }

        // Apply scroll
        let visible_items: Vec<ListItem> = items.into_iter().skip(scroll).collect();

        let list = List::new(visible_items).block(block);
        frame.render_widget(list, area);
    }
}

fn format_reminder(rem: &Reminder, max_width: usize, selected: bool) -> ListItem<'static> {
    let color = theme::parse_color(&rem.color)
        .unwrap_or_else(|| theme::current().category(rem.category));
    let badge = Span::styled("  ", Style::default().bg(color));

    let time_span = Span::styled(
        format!(" {} ", rem.time),
        Style::default().add_modifier(Modifier::DIM),
    );

    let title_style = if selected {
        theme::current().selected
    } else if rem.is_completed {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    let checkbox = if rem.is_completed { "[x] " } else { "[ ] " };
    let title_span = Span::styled(format!("{}{}", checkbox, rem.title), title_style);

    let mut spans = vec![badge, time_span, title_span];

    if rem.is_recurring() {
        spans.push(Span::styled(
            format!(" ({})", rem.repeat.label()),
            theme::current().dim,
        ));
    }

    // Category tag only if there's room.
    if let Some(cat) = rem.category {
        let used: usize = spans.iter().map(Span::width).sum();
        let tag = format!(" #{}", cat.label());
        if used + tag.len() <= max_width {
            spans.push(Span::styled(tag, theme::current().dim));
        }
    }

    ListItem::new(Line::from(spans))
}

fn format_todo(todo: &Todo, selected: bool) -> ListItem<'static> {
    let checkbox = if todo.completed { " [x] " } else { " [ ] " };
    let text_style = if selected {
        theme::current().selected
    } else if todo.completed {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    ListItem::new(Line::from(vec![
        Span::styled(checkbox, Style::default()),
        Span::styled(todo.text.clone(), text_style),
    ]))
}

/// Render a reminder/todo detail popup overlay.
pub fn render_detail_popup(
    frame: &mut Frame,
    area: Rect,
    detail: DaySelection,
    reminders: &[Reminder],
    todos: &[Todo],
) {
    let popup_w = area.width.min(60).max(30);
    let popup_h = area.height.min(16).max(8);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    match detail {
        DaySelection::Reminder(idx) => {
            if let Some(rem) = reminders.get(idx) {
                render_reminder_detail(frame, popup_area, rem);
            }
        }
        DaySelection::Todo(idx) => {
            if let Some(todo) = todos.get(idx) {
                render_todo_detail(frame, popup_area, todo);
            }
        }
    }
}

fn render_reminder_detail(frame: &mut Frame, area: Rect, rem: &Reminder) {
    let block = Block::default()
        .title(format!(" {} ", rem.title))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    let color = theme::parse_color(&rem.color)
        .unwrap_or_else(|| theme::current().category(rem.category));
    let category = rem.category.map(|c| c.label()).unwrap_or("uncategorized");
    lines.push(Line::from(vec![
        Span::styled("  ", Style::default().bg(color)),
        Span::styled(format!(" {}", category), Style::default()),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Time: ", theme::current().dim),
        Span::styled(rem.time.clone(), Style::default()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Date: ", theme::current().dim),
        Span::styled(
            rem.date.format("%A, %B %d, %Y").to_string(),
            Style::default(),
        ),
    ]));

    if rem.is_recurring() {
        lines.push(Line::from(vec![
            Span::styled("Repeats: ", theme::current().dim),
            Span::styled(rem.repeat.label(), Style::default()),
        ]));
    }

    if !rem.alerts.is_empty() {
        let alerts = rem
            .alerts
            .iter()
            .map(|m| format!("{} min before", m))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(vec![
            Span::styled("Alerts: ", theme::current().dim),
            Span::styled(alerts, Style::default()),
        ]));
    }

    if let Some(ref notes) = rem.description {
        if !notes.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Notes:", theme::current().dim)));
            for line in notes.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc to close",
        theme::current().dim,
    )));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}

fn render_todo_detail(frame: &mut Frame, area: Rect, todo: &Todo) {
    let status = if todo.completed { "Done" } else { "Open" };

    let block = Block::default()
        .title(format!(" {} ", todo.text))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(vec![
            Span::styled("Status: ", theme::current().dim),
            Span::styled(status, Style::default()),
        ]),
        Line::from(vec![
            Span::styled("Date: ", theme::current().dim),
            Span::styled(
                todo.date.format("%A, %B %d, %Y").to_string(),
                Style::default(),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled("Press Esc to close", theme::current().dim)),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
