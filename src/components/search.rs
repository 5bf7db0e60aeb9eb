use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::model::SearchHit;
use crate::theme;

pub struct SearchView;

impl SearchView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        query: &str,
        results: &[SearchHit],
        selected: usize,
    ) {
        let popup_w = area.width.min(64).max(30);
        let popup_h = area.height.min(20).max(10);
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 3;
        let popup_area = Rect::new(x, y, popup_w, popup_h);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Search ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // input
            Constraint::Length(1), // divider
            Constraint::Min(1),    // results
            Constraint::Length(1), // help
        ])
        .split(inner);

        let input = Line::from(vec![
            Span::styled("> ", theme::current().dim),
            Span::styled(format!("{query}_"), Style::default().fg(Color::Cyan)),
        ]);
        frame.render_widget(Paragraph::new(input), rows[0]);

        if results.is_empty() {
            let msg = if query.trim().is_empty() {
                "Type to search reminders and todos"
            } else {
                "No matches"
            };
            frame.render_widget(
                Paragraph::new(msg).style(theme::current().dim),
                rows[2],
            );
        } else {
            let items: Vec<ListItem> = results
                .iter()
                .enumerate()
                .map(|(i, hit)| format_hit(hit, i == selected, rows[2].width as usize))
                .collect();
            // Keep the selection visible.
            let visible_rows = rows[2].height as usize;
            let skip = selected.saturating_sub(visible_rows.saturating_sub(1));
            let list = List::new(items.into_iter().skip(skip).collect::<Vec<_>>());
            frame.render_widget(list, rows[2]);
        }

        let help = Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Go to date ", theme::current().dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Close", theme::current().dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[3]);
    }
}

fn format_hit(hit: &SearchHit, selected: bool, max_width: usize) -> ListItem<'static> {
    let (kind, kind_style) = match hit {
        SearchHit::Reminder(_) => ("rem", Style::default().fg(Color::Blue)),
        SearchHit::Recurring(r) => (r.repeat.label(), Style::default().fg(Color::Magenta)),
        SearchHit::Todo(_) => ("todo", Style::default().fg(Color::Green)),
    };

    let title_style = if selected {
        theme::current().selected
    } else {
        Style::default()
    };

    let date = hit.date().format("%Y-%m-%d").to_string();
    let label = format!("[{kind:>7}] ");
    let room = max_width.saturating_sub(label.len() + date.len() + 2);
    let title: String = hit.title().chars().take(room).collect();

    ListItem::new(Line::from(vec![
        Span::styled(label, kind_style),
        Span::styled(title, title_style),
        Span::styled(format!("  {date}"), theme::current().dim),
    ]))
}
