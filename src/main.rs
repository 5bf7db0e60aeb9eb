mod app;
mod components;
mod event;
mod model;
mod notify;
mod store;
mod theme;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use app::{App, Overlay, ViewMode};
use chrono::Datelike;
use color_eyre::eyre::{bail, Result};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};

fn main() -> Result<()> {
    color_eyre::install()?;

    // Backup import/export run headless.
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {}
        [flag, path] if flag == "--export" => return export_backup(PathBuf::from(path)),
        [flag, path] if flag == "--import" => return import_backup(PathBuf::from(path)),
        _ => bail!("usage: memocal [--export FILE | --import FILE]"),
    }

    let mut app = App::new()?;
    theme::init(app.preferences().theme.as_deref());

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    result
}

fn export_backup(path: PathBuf) -> Result<()> {
    let store = store::Store::open_default()?;
    let doc = store.load()?;
    store.export_to(&doc, &path)?;
    println!(
        "Exported {} reminders and {} todos to {}",
        doc.reminders.len(),
        doc.todos.len(),
        path.display()
    );
    Ok(())
}

fn import_backup(path: PathBuf) -> Result<()> {
    let store = store::Store::open_default()?;
    let mut doc = store.load()?;
    let (reminders, todos) = store.import_from(&mut doc, &path)?;
    println!("Merged {} reminders and {} todos", reminders, todos);
    Ok(())
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();
            let w = area.width;

            // Main layout: content + status bar
            let layout =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
            let content_area = layout[0];

            match app.view_mode {
                ViewMode::Month => render_month_layout(frame, content_area, app, w),
                ViewMode::Week => {
                    components::WeekView::render(
                        frame,
                        content_area,
                        app.selected_date,
                        app.today,
                        app.week_start(),
                        &app.snapshot,
                    );
                }
                ViewMode::Day => {
                    components::DayView::render(
                        frame,
                        content_area,
                        app.selected_date,
                        &app.day_reminders,
                        &app.day_todos,
                        app.day_selection(),
                        app.day_scroll,
                    );
                }
            }

            match &app.overlay {
                Some(Overlay::ReminderForm(form)) => {
                    components::ReminderForm::render(frame, area, form);
                }
                Some(Overlay::TodoInput(text)) => {
                    components::Prompt::render(frame, area, "New Todo", text);
                }
                Some(Overlay::Search {
                    query,
                    results,
                    selected,
                }) => {
                    components::SearchView::render(frame, area, query, results, *selected);
                }
                Some(Overlay::Stats) => {
                    let month_label = app.selected_date.format("%B %Y").to_string();
                    let stats = app
                        .snapshot
                        .stats(app.selected_date.year(), app.selected_date.month());
                    components::StatsView::render(frame, area, &month_label, &stats);
                }
                Some(Overlay::Detail(selection)) => {
                    components::day_view::render_detail_popup(
                        frame,
                        area,
                        *selection,
                        &app.day_reminders,
                        &app.day_todos,
                    );
                }
                Some(Overlay::AllTodos { selected }) => {
                    let todos = app.all_todos();
                    components::AllTodosView::render(frame, area, &todos, *selected);
                }
                Some(Overlay::Help) => render_help(frame, area),
                None => {}
            }

            render_status_bar(frame, layout[1], app, w);
        })?;

        match event::next_input(Duration::from_millis(250))? {
            event::Input::Tick => app.tick(),
            event::Input::Key(key) => {
                // Clear transient status on any key
                app.status_message = None;
                handle_key(app, key.code, key.modifiers);
            }
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match &mut app.overlay {
        Some(Overlay::Help) => {
            if matches!(code, KeyCode::Esc | KeyCode::Char('?')) {
                app.overlay = None;
            }
        }
        Some(Overlay::Detail(_)) => {
            if code == KeyCode::Esc {
                app.overlay = None;
            }
        }
        Some(Overlay::Stats) => {
            if matches!(code, KeyCode::Esc | KeyCode::Char('s')) {
                app.overlay = None;
            }
        }
        Some(Overlay::AllTodos { .. }) => handle_all_todos_key(app, code),
        Some(Overlay::ReminderForm(_)) => handle_form_key(app, code),
        Some(Overlay::TodoInput(_)) => handle_todo_key(app, code),
        Some(Overlay::Search { .. }) => handle_search_key(app, code),
        None => handle_normal_key(app, code, modifiers),
    }
}

fn handle_all_todos_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.overlay = None,
        KeyCode::Enter => app.all_todos_jump(),
        KeyCode::Char(' ') => app.all_todos_toggle(),
        KeyCode::Char('d') => app.all_todos_delete(),
        KeyCode::Down | KeyCode::Char('j') => {
            let count = app.all_todos().len();
            if let Some(Overlay::AllTodos { selected }) = &mut app.overlay {
                if count > 0 {
                    *selected = (*selected + 1).min(count - 1);
                }
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(Overlay::AllTodos { selected }) = &mut app.overlay {
                *selected = selected.saturating_sub(1);
            }
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut App, code: KeyCode) {
    let Some(Overlay::ReminderForm(form)) = &mut app.overlay else {
        return;
    };
    match code {
        KeyCode::Esc => app.overlay = None,
        KeyCode::Enter => {
            let form = form.clone();
            app.submit_reminder_form(&form);
        }
        KeyCode::Tab => form.active_field = form.active_field.next(),
        KeyCode::BackTab => form.active_field = form.active_field.prev(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(' ') => {
            // Space cycles choice fields and types into text fields.
            if matches!(
                form.active_field,
                components::reminder_form::FormField::Category
                    | components::reminder_form::FormField::Repeat
                    | components::reminder_form::FormField::Color
            ) {
                form.cycle();
            } else {
                form.input_char(' ');
            }
        }
        KeyCode::Char(c) => form.input_char(c),
        _ => {}
    }
}

fn handle_todo_key(app: &mut App, code: KeyCode) {
    let Some(Overlay::TodoInput(text)) = &mut app.overlay else {
        return;
    };
    match code {
        KeyCode::Esc => app.overlay = None,
        KeyCode::Enter => {
            let text = text.clone();
            app.submit_todo_input(&text);
        }
        KeyCode::Backspace => {
            text.pop();
        }
        KeyCode::Char(c) => text.push(c),
        _ => {}
    }
}

fn handle_search_key(app: &mut App, code: KeyCode) {
    let Some(Overlay::Search {
        query,
        results,
        selected,
    }) = &mut app.overlay
    else {
        return;
    };
    match code {
        KeyCode::Esc => app.overlay = None,
        KeyCode::Enter => {
            if let Some(hit) = results.get(*selected) {
                let date = hit.date();
                app.jump_to(date);
            }
        }
        KeyCode::Down => {
            if !results.is_empty() {
                *selected = (*selected + 1).min(results.len() - 1);
            }
        }
        KeyCode::Up => *selected = selected.saturating_sub(1),
        KeyCode::Backspace => {
            query.pop();
            app.refresh_search();
        }
        KeyCode::Char(c) => {
            query.push(c);
            app.refresh_search();
        }
        _ => {}
    }
}

fn handle_normal_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('1'), _) => app.view_mode = ViewMode::Month,
        (KeyCode::Char('2'), _) => app.view_mode = ViewMode::Week,
        (KeyCode::Char('3'), _) => app.view_mode = ViewMode::Day,
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Char('n'), _) => app.open_reminder_form(),
        (KeyCode::Char('a'), _) => app.open_todo_input(),
        (KeyCode::Char('e'), _) => app.edit_selected(),
        (KeyCode::Char('d'), _) => app.delete_selected(),
        (KeyCode::Char('u'), _) => app.undo(),
        (KeyCode::Char(' '), _) => app.toggle_selected(),
        (KeyCode::Char('/'), _) => app.open_search(),
        (KeyCode::Char('s'), _) => app.overlay = Some(Overlay::Stats),
        (KeyCode::Char('T'), _) => app.open_all_todos(),
        (KeyCode::Char('b'), _) => app.toggle_notifications(),
        (KeyCode::Enter, _) => {
            if let Some(selection) = app.day_selection() {
                if app.day_item_count() > 0 {
                    app.overlay = Some(Overlay::Detail(selection));
                }
            }
        }
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.prev_day(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.next_day(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
            if app.view_mode == ViewMode::Week {
                app.prev_week();
            } else {
                app.cursor_up();
            }
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
            if app.view_mode == ViewMode::Week {
                app.next_week();
            } else {
                app.cursor_down();
            }
        }
        (KeyCode::Char('['), _) => app.prev_month(),
        (KeyCode::Char(']'), _) => app.next_month(),
        (KeyCode::Char('?'), _) => app.overlay = Some(Overlay::Help),
        _ => {}
    }
}

fn render_month_layout(frame: &mut ratatui::Frame, area: Rect, app: &App, total_width: u16) {
    if total_width < 60 {
        components::MonthView::render(
            frame,
            area,
            app.selected_date,
            app.today,
            &app.days_with_reminders,
            &app.days_with_todos,
        );
    } else {
        let month_w = if total_width >= 100 { 44 } else { 30 };
        let content =
            Layout::horizontal([Constraint::Length(month_w), Constraint::Min(20)]).split(area);

        components::MonthView::render(
            frame,
            content[0],
            app.selected_date,
            app.today,
            &app.days_with_reminders,
            &app.days_with_todos,
        );

        components::DayView::render(
            frame,
            content[1],
            app.selected_date,
            &app.day_reminders,
            &app.day_todos,
            app.day_selection(),
            app.day_scroll,
        );
    }
}

fn render_status_bar(frame: &mut ratatui::Frame, area: Rect, app: &App, w: u16) {
    use ratatui::text::{Line, Span};
    use ratatui::widgets::Paragraph;

    let w = w as usize;

    let mode_str = match app.view_mode {
        ViewMode::Month => "[1]Month",
        ViewMode::Week => "[2]Week",
        ViewMode::Day => "[3]Day",
    };

    let overlay_str = match app.overlay {
        Some(Overlay::ReminderForm(_)) => " [Reminder]",
        Some(Overlay::TodoInput(_)) => " [Todo]",
        Some(Overlay::Search { .. }) => " [Search]",
        Some(Overlay::AllTodos { .. }) => " [Todos]",
        _ => "",
    };

    // Show status message if present, otherwise context-aware hints
    let right_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        match app.view_mode {
            ViewMode::Day | ViewMode::Month if w >= 90 => {
                " hjkl:Nav [/]:Mon t:Today n:New a:Todo Sp:Toggle e:Edit d:Del u:Undo /:Find ?:Help q:Quit"
                    .to_string()
            }
            ViewMode::Day | ViewMode::Month if w >= 50 => {
                " jk:Select Sp:Toggle n:New a:Todo q:Quit".to_string()
            }
            ViewMode::Week if w >= 70 => {
                " hl:Day jk:Week [/]:Mon t:Today n:New ?:Help q:Quit".to_string()
            }
            _ => " ?:Help q:Quit".to_string(),
        }
    };

    let left = format!(" {}{} ", mode_str, overlay_str);
    let padding_len = w.saturating_sub(left.len() + right_text.len());
    let padding = " ".repeat(padding_len);

    let line = Line::from(vec![
        Span::styled(left, theme::current().status),
        Span::styled(padding, theme::current().status),
        Span::styled(right_text, theme::current().status),
    ]);

    let bar = Paragraph::new(line).style(theme::current().status);
    frame.render_widget(bar, area);
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.min(52).max(30);
    let popup_h = area.height.min(24).max(12);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let desc_style = Style::default();
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let dim = theme::current().dim;

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        Line::from(vec![
            Span::styled("  h/l ", key_style),
            Span::styled("or ", dim),
            Span::styled("\u{2190}/\u{2192}  ", key_style),
            Span::styled("Previous/next day", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  j/k       ", key_style),
            Span::styled("Move selection (week: jump week)", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  [/]       ", key_style),
            Span::styled("Previous/next month", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  t         ", key_style),
            Span::styled("Jump to today", desc_style),
        ]),
        Line::from(""),
        Line::from(Span::styled("Views", section_style)),
        Line::from(vec![
            Span::styled("  1/2/3     ", key_style),
            Span::styled("Month / Week / Day view", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  /         ", key_style),
            Span::styled("Search reminders and todos", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  s         ", key_style),
            Span::styled("Month dashboard", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  T         ", key_style),
            Span::styled("All todos across dates", desc_style),
        ]),
        Line::from(""),
        Line::from(Span::styled("Actions", section_style)),
        Line::from(vec![
            Span::styled("  n         ", key_style),
            Span::styled("New reminder", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  a         ", key_style),
            Span::styled("New todo for the selected day", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  e         ", key_style),
            Span::styled("Edit selected reminder", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  Space     ", key_style),
            Span::styled("Toggle completion", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  d         ", key_style),
            Span::styled("Delete selected", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  u         ", key_style),
            Span::styled("Undo last change", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  b         ", key_style),
            Span::styled("Toggle alert notifications", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", key_style),
            Span::styled("View details", desc_style),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", dim),
            Span::styled("Esc     ", key_style),
            Span::styled("Quit / close popup", desc_style),
        ]),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
