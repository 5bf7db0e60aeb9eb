use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::theme;

/// One-line text input popup (new todo).
pub struct Prompt;

impl Prompt {
    pub fn render(frame: &mut Frame, area: Rect, title: &str, value: &str) {
        let popup_w = area.width.min(50).max(24);
        let popup_h = 3;
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" {} ", title))
            .title_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let line = Line::from(vec![
            Span::styled("> ", theme::current().dim),
            Span::styled(format!("{value}_"), Style::default().fg(Color::Cyan)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}
