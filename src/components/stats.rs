use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::MonthStats;
use crate::theme;

pub struct StatsView;

impl StatsView {
    pub fn render(frame: &mut Frame, area: Rect, month_label: &str, stats: &MonthStats) {
        let popup_w = area.width.min(48).max(30);
        let popup_h = area.height.min(18).max(12);
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" Dashboard — {} ", month_label))
            .title_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let bar_width = (inner.width as usize).saturating_sub(14).max(10);
        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(Span::styled(
            "Todos",
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        lines.push(Line::from(vec![
            Span::styled("Done: ", theme::current().dim),
            Span::raw(format!(
                "{}/{} ({}%)",
                stats.completed_todos, stats.total_todos, stats.completion_rate
            )),
        ]));
        lines.push(Line::from(Span::styled(
            ratio_bar(stats.completion_rate as usize, 100, bar_width),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled(
            "Reminders",
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        lines.push(Line::from(vec![
            Span::styled("This month: ", theme::current().dim),
            Span::raw(stats.month_reminders.to_string()),
        ]));
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled(
            "By category",
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        let max_count = stats
            .category_counts
            .iter()
            .map(|(_, n)| *n)
            .max()
            .unwrap_or(0);
        for (cat, count) in &stats.category_counts {
            if *count == 0 {
                continue;
            }
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<9}", cat.label()),
                    Style::default().fg(theme::current().category(Some(*cat))),
                ),
                Span::styled(
                    ratio_bar(*count, max_count, bar_width.saturating_sub(9)),
                    Style::default().fg(theme::current().category(Some(*cat))),
                ),
                Span::styled(format!(" {}", count), theme::current().dim),
            ]));
        }
        if max_count == 0 {
            lines.push(Line::from(Span::styled(
                "No categorized reminders yet",
                theme::current().dim,
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Esc to close",
            theme::current().dim,
        )));

        let para = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(para, inner);
    }
}

fn ratio_bar(value: usize, max: usize, width: usize) -> String {
    if max == 0 || width == 0 {
        return String::new();
    }
    let filled = (value * width / max).min(width);
    let mut bar = "\u{2588}".repeat(filled);
    bar.push_str(&"\u{2591}".repeat(width - filled));
    bar
}
