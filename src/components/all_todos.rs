use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::model::Todo;
use crate::theme;

/// Every todo across all dates, newest date first.
pub struct AllTodosView;

impl AllTodosView {
    pub fn render(frame: &mut Frame, area: Rect, todos: &[Todo], selected: usize) {
        let popup_w = area.width.min(60).max(30);
        let popup_h = area.height.min(20).max(10);
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" All Todos ")
            .title_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let rows = Layout::vertical([
            Constraint::Min(1),    // list
            Constraint::Length(1), // help
        ])
        .split(inner);

        if todos.is_empty() {
            frame.render_widget(
                Paragraph::new("No todos yet").style(theme::current().dim),
                rows[0],
            );
        } else {
            let items: Vec<ListItem> = todos
                .iter()
                .enumerate()
                .map(|(i, todo)| format_todo(todo, i == selected, rows[0].width as usize))
                .collect();
            // Keep the selection visible.
            let visible_rows = rows[0].height as usize;
            let skip = selected.saturating_sub(visible_rows.saturating_sub(1));
            let list = List::new(items.into_iter().skip(skip).collect::<Vec<_>>());
            frame.render_widget(list, rows[0]);
        }

        let help = Line::from(vec![
            Span::styled("Space", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Toggle ", theme::current().dim),
            Span::styled("d", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Delete ", theme::current().dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Go to date ", theme::current().dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Close", theme::current().dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[1]);
    }
}

fn format_todo(todo: &Todo, selected: bool, max_width: usize) -> ListItem<'static> {
    let checkbox = if todo.completed { "[x] " } else { "[ ] " };
    let date = todo.date.format("%Y-%m-%d").to_string();

    let text_style = if selected {
        theme::current().selected
    } else if todo.completed {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    let room = max_width.saturating_sub(checkbox.len() + date.len() + 2);
    let text: String = todo.text.chars().take(room).collect();

    ListItem::new(Line::from(vec![
        Span::styled(checkbox, Style::default()),
        Span::styled(text, text_style),
        Span::styled(format!("  {date}"), theme::current().dim),
    ]))
}
