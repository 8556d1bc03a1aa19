//! UI rendering for the TUI

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use super::app::{App, Pane};
use super::compose;
use super::messages;

/// Main render function
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Layout: header (1 line) + main content + status bar (1 line)
    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), app);

    // Split main area: messages (fill) + compose box
    let [messages_area, compose_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(compose::COMPOSE_HEIGHT),
    ])
    .areas(main_area);

    messages::render(
        messages_area,
        frame.buffer_mut(),
        &mut app.list,
        app.active_pane == Pane::Messages,
    );

    compose::render(
        compose_area,
        frame,
        &app.compose,
        app.active_pane == Pane::Compose,
    );

    render_status(status_area, frame.buffer_mut(), app);
}

/// Render the header bar
fn render_header(area: Rect, buf: &mut Buffer, app: &App) {
    let title = Span::styled(
        " Chat Room",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let user = format!("{} ", app.sender.username);
    let left_width = " Chat Room".len();
    let padding_width = (area.width as usize)
        .saturating_sub(left_width)
        .saturating_sub(user.len());

    let header_line = Line::from(vec![
        title,
        Span::raw(" ".repeat(padding_width)),
        Span::styled(user, Style::default().fg(Color::Cyan)),
    ]);

    Paragraph::new(header_line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

/// Render the status bar
fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    let sep_style = Style::default().fg(Color::Gray);

    let feed = Span::styled(
        format!(" feed: {} ", app.feed_source),
        Style::default().fg(Color::Yellow),
    );
    let pane = Span::styled(
        format!("Tab: {} ", app.active_pane.as_str()),
        Style::default().fg(Color::Cyan),
    );
    let hints = Span::styled("r: reload | q: quit", Style::default().fg(Color::Gray));

    let status_line = Line::from(vec![
        feed,
        Span::styled("| ", sep_style),
        pane,
        Span::styled("| ", sep_style),
        hints,
    ]);

    Paragraph::new(status_line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}
