use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const ACCENT: Color = Color::Rgb(59, 110, 165);

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // username
            Constraint::Length(3), // install version
            Constraint::Length(3), // launch version
            Constraint::Length(3), // buttons
            Constraint::Length(3), // progress
            Constraint::Length(1), // status
            Constraint::Min(0),    // history
            Constraint::Length(1), // footer
        ])
        .split(f.size());

    let title = Paragraph::new("Minecraft Launcher")
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));
    f.render_widget(title, chunks[0]);

    draw_username(f, app, chunks[1]);
    draw_selector(
        f,
        "Install Version",
        &app.state.install_versions,
        app.state.selected_install.as_deref(),
        app.focus == Focus::InstallVersion,
        chunks[2],
    );
    draw_selector(
        f,
        "Launch Version",
        &app.state.launch_versions,
        app.state.selected_launch.as_deref(),
        app.focus == Focus::LaunchVersion,
        chunks[3],
    );
    draw_buttons(f, app, chunks[4]);
    draw_progress(f, app, chunks[5]);

    let status = Paragraph::new(app.state.status.as_str())
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    f.render_widget(status, chunks[6]);

    draw_history(f, app, chunks[7]);

    let footer = Paragraph::new("Tab: Next | ←/→: Change version | Enter: Press | Esc: Exit")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(footer, chunks[8]);

    if app.state.notice.is_some() {
        draw_notice(f, app, f.size());
    }
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default().borders(Borders::ALL).title(title).border_style(style)
}

fn draw_username(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Username;
    let cursor = if focused && app.tick % 10 < 5 { "▏" } else { "" };
    let field = Paragraph::new(format!("{}{}", app.state.username, cursor))
        .block(focus_block("Username", focused));
    f.render_widget(field, area);
}

fn draw_selector(
    f: &mut Frame,
    title: &str,
    options: &[String],
    selected: Option<&str>,
    focused: bool,
    area: Rect,
) {
    let text = match selected {
        Some(id) => {
            let position = options
                .iter()
                .position(|o| o == id)
                .map(|i| format!("  ({}/{})", i + 1, options.len()))
                .unwrap_or_default();
            format!("◀ {} ▶{}", id, position)
        }
        None if options.is_empty() => "(none)".to_string(),
        None => "◀ select ▶".to_string(),
    };

    let selector = Paragraph::new(text).block(focus_block(title, focused));
    f.render_widget(selector, area);
}

fn draw_buttons(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let buttons = [
        ("Install", Focus::InstallButton, app.state.install_enabled()),
        ("Launch", Focus::LaunchButton, app.state.launch_enabled()),
        ("Refresh", Focus::RefreshButton, app.state.refresh_enabled()),
    ];

    for ((label, focus, enabled), area) in buttons.into_iter().zip(columns.iter()) {
        let focused = app.focus == focus;
        let style = match (enabled, focused) {
            (false, _) => Style::default().fg(Color::DarkGray),
            (true, true) => Style::default()
                .fg(Color::White)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
            (true, false) => Style::default().fg(Color::White),
        };
        let button = Paragraph::new(label)
            .style(style)
            .alignment(Alignment::Center)
            .block(focus_block("", focused));
        f.render_widget(button, *area);
    }
}

fn draw_progress(f: &mut Frame, app: &App, area: Rect) {
    let (ratio, label) = if app.state.in_progress() {
        let spinner = SPINNER[(app.tick as usize) % SPINNER.len()];
        // Indeterminate: sweep back and forth.
        let phase = (app.tick % 40) as f64 / 20.0;
        let ratio = if phase <= 1.0 { phase } else { 2.0 - phase };
        (ratio, format!("{} Working...", spinner))
    } else {
        (0.0, String::new())
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(ACCENT))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, area);
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .state
        .history
        .iter()
        .rev()
        .take(visible)
        .map(|entry| ListItem::new(entry.format()).style(Style::default().fg(Color::Gray)))
        .collect();

    let history = List::new(items).block(Block::default().borders(Borders::ALL).title("Activity"));
    f.render_widget(history, area);
}

fn draw_notice(f: &mut Frame, app: &App, area: Rect) {
    let Some(notice) = &app.state.notice else {
        return;
    };

    let popup = centered_rect(60, 30, area);
    f.render_widget(Clear, popup);

    let text = vec![
        Line::from(notice.message.as_str()),
        Line::from(""),
        Line::from(Span::styled("Enter / Esc: OK", Style::default().fg(Color::Gray))),
    ];
    let dialog = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(notice.title.as_str())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(dialog, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
