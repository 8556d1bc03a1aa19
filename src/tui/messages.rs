//! Message list pane: renders chat messages with type-specific layouts.
//!
//! Each message becomes a small fragment of lines: an avatar badge and a
//! colored username header for incoming messages, the kind-specific body,
//! and an `HH:MM` timestamp. Outgoing messages (current user) render
//! right-aligned without header or badge.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::models::{ChatMessage, MessageKind};

use super::palette;

/// What the list pane is currently showing.
pub enum ListView {
    /// The single feed fetch is in flight.
    Loading,
    /// The fetch failed; holds the error text to display inline.
    Failed(String),
    /// Messages are loaded (possibly zero of them).
    Loaded,
}

/// State for the message list pane.
pub struct MessageListState {
    pub view: ListView,
    pub messages: Vec<ChatMessage>,
    /// Vertical scroll offset in rendered lines (0 = top).
    pub scroll_offset: usize,
    /// Follow the newest entry unless the user scrolled away.
    pub stick_to_bottom: bool,
    /// Fixed identity deciding left/right alignment.
    pub current_user_id: String,
    /// Max scroll seen at last render; scroll keys clamp against this.
    last_max_scroll: usize,
}

impl MessageListState {
    pub fn new(current_user_id: String) -> Self {
        Self {
            view: ListView::Loading,
            messages: Vec::new(),
            scroll_offset: 0,
            stick_to_bottom: true,
            current_user_id,
            last_max_scroll: 0,
        }
    }

    pub fn set_loading(&mut self) {
        self.view = ListView::Loading;
        self.messages.clear();
        self.scroll_offset = 0;
        self.stick_to_bottom = true;
    }

    pub fn set_failed(&mut self, error: String) {
        self.view = ListView::Failed(error);
        self.messages.clear();
    }

    pub fn set_messages(&mut self, messages: Vec<ChatMessage>) {
        self.view = ListView::Loaded;
        self.messages = messages;
        self.stick_to_bottom = true;
    }

    /// Append one message and follow it.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.view = ListView::Loaded;
        self.stick_to_bottom = true;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.stick_to_bottom = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = (self.scroll_offset + lines).min(self.last_max_scroll);
        if self.scroll_offset >= self.last_max_scroll {
            self.stick_to_bottom = true;
        }
    }

    pub fn scroll_home(&mut self) {
        self.stick_to_bottom = false;
        self.scroll_offset = 0;
    }

    pub fn scroll_end(&mut self) {
        self.stick_to_bottom = true;
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the message list pane into the given area.
pub fn render(area: Rect, buf: &mut Buffer, state: &mut MessageListState, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_type = if focused {
        BorderType::Double
    } else {
        BorderType::Plain
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .title(" Chat Room ");

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let lines = match &state.view {
        ListView::Loading => status_lines("Loading messages..."),
        ListView::Failed(error) => failure_lines(error, inner.width as usize),
        ListView::Loaded if state.messages.is_empty() => status_lines("No messages found."),
        ListView::Loaded => {
            build_message_lines(&state.messages, &state.current_user_id, inner.width as usize)
        }
    };

    let total_lines = lines.len();
    let visible_height = inner.height as usize;
    let max_scroll = total_lines.saturating_sub(visible_height);
    state.last_max_scroll = max_scroll;

    let scroll = if state.stick_to_bottom {
        state.scroll_offset = max_scroll;
        max_scroll
    } else {
        state.scroll_offset.min(max_scroll)
    };

    for (row, line_idx) in (scroll..total_lines).take(visible_height).enumerate() {
        let y = inner.y + row as u16;
        let line_area = Rect::new(inner.x, y, inner.width, 1);
        Paragraph::new(lines[line_idx].clone()).render(line_area, buf);
    }

    // Scroll indicators on the right edge.
    if total_lines > visible_height {
        let indicator_x = inner.x + inner.width.saturating_sub(1);
        if scroll > 0 {
            let cell = &mut buf[(indicator_x, inner.y)];
            cell.set_char('^');
            cell.set_style(Style::default().fg(Color::DarkGray));
        }
        if scroll + visible_height < total_lines {
            let bottom_y = inner.y + inner.height.saturating_sub(1);
            let cell = &mut buf[(indicator_x, bottom_y)];
            cell.set_char('v');
            cell.set_style(Style::default().fg(Color::DarkGray));
        }
    }
}

/// Single dim status line replacing the list content.
fn status_lines(text: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", text),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

/// Inline error state: headline plus the wrapped error text.
fn failure_lines(error: &str, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Failed to load messages. Please try again.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    ];
    for l in wrap_text(&format!("Error: {}", error), width.saturating_sub(4).max(10)) {
        lines.push(Line::from(Span::styled(
            format!("  {}", l),
            Style::default().fg(Color::Red),
        )));
    }
    lines
}

/// Build the flat line buffer for all message fragments.
pub fn build_message_lines(
    messages: &[ChatMessage],
    current_user_id: &str,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in messages {
        let outgoing = msg.is_from(current_user_id);
        render_fragment(&mut lines, msg, outgoing, width);
        // Blank line between messages.
        lines.push(Line::from(""));
    }

    lines
}

/// Render one message fragment into the line buffer.
fn render_fragment(lines: &mut Vec<Line<'static>>, msg: &ChatMessage, outgoing: bool, width: usize) {
    // Bubbles take at most three quarters of the pane.
    let bubble_width = (width.saturating_mul(3) / 4).max(12);

    if !outgoing {
        lines.push(header_line(msg));
    }

    let body = body_lines(msg, bubble_width);
    for line in body {
        if outgoing {
            lines.push(right_align(line, width));
        } else {
            lines.push(indent(line, 2));
        }
    }

    let ts = Line::from(Span::styled(
        msg.timestamp_display(),
        Style::default().fg(Color::DarkGray),
    ));
    if outgoing {
        lines.push(right_align(ts, width));
    } else {
        lines.push(indent(ts, 2));
    }
}

/// `[B] Bob` header with the avatar badge and hash-derived username color.
fn header_line(msg: &ChatMessage) -> Line<'static> {
    let color = palette::username_color(&msg.sender.username);

    // The colored badge is the placeholder for a missing avatar URL; with an
    // avatar present the badge stays neutral.
    let badge_style = if msg.sender.avatar.is_none() {
        Style::default().fg(Color::White).bg(color)
    } else {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    };

    Line::from(vec![
        Span::styled(format!(" {} ", msg.sender.initial()), badge_style),
        Span::raw(" "),
        Span::styled(
            msg.sender.username.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Kind-specific body lines for one message.
fn body_lines(msg: &ChatMessage, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    match &msg.kind {
        MessageKind::Text => {
            for l in wrap_text(msg.message.as_deref().unwrap_or(""), width) {
                lines.push(Line::from(l));
            }
        }
        MessageKind::Image => {
            let preview = msg
                .thumbnail_url
                .as_deref()
                .or(msg.file_url.as_deref())
                .unwrap_or("(no image url)");
            lines.push(tagged_line("[image]", preview, width));
            if let Some(url) = msg.file_url.as_deref() {
                lines.push(link_line(url, width));
            }
            push_caption(&mut lines, msg, width);
        }
        MessageKind::Video => {
            let source = msg.file_url.as_deref().unwrap_or("(no video url)");
            lines.push(tagged_line("[video]", source, width));
            if let Some(poster) = msg.thumbnail_url.as_deref() {
                lines.push(Line::from(Span::styled(
                    truncate(&format!("poster: {}", poster), width),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            push_caption(&mut lines, msg, width);
        }
        MessageKind::File => {
            let icon = if msg.is_pdf() { "[pdf]" } else { "[file]" };
            let name = msg.file_name.as_deref().unwrap_or("File");
            lines.push(tagged_line(icon, name, width));
            if let Some(size) = msg.file_size.as_deref() {
                lines.push(Line::from(Span::styled(
                    size.to_string(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            push_caption(&mut lines, msg, width);
            if let Some(url) = msg.file_url.as_deref() {
                lines.push(link_line(url, width));
            }
        }
        MessageKind::Unknown(raw) => {
            lines.push(Line::from(Span::styled(
                format!("Unsupported message type: {}", raw),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
    }

    lines
}

/// Optional caption under a media body.
fn push_caption(lines: &mut Vec<Line<'static>>, msg: &ChatMessage, width: usize) {
    if let Some(caption) = msg.message.as_deref() {
        if !caption.is_empty() {
            for l in wrap_text(caption, width) {
                lines.push(Line::from(l));
            }
        }
    }
}

/// `[tag] text` line with a cyan tag.
fn tagged_line(tag: &str, text: &str, width: usize) -> Line<'static> {
    let text = truncate(text, width.saturating_sub(tag.len() + 1));
    Line::from(vec![
        Span::styled(tag.to_string(), Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::raw(text),
    ])
}

/// Dim full-file link target.
fn link_line(url: &str, width: usize) -> Line<'static> {
    Line::from(Span::styled(
        truncate(&format!("link: {}", url), width),
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED),
    ))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn indent(line: Line<'static>, by: usize) -> Line<'static> {
    let mut spans = vec![Span::raw(" ".repeat(by))];
    spans.extend(line.spans);
    Line::from(spans)
}

fn right_align(line: Line<'static>, width: usize) -> Line<'static> {
    let used: usize = line.spans.iter().map(|s| s.content.width()).sum();
    let pad = width.saturating_sub(used);
    let mut spans = vec![Span::raw(" ".repeat(pad))];
    spans.extend(line.spans);
    Line::from(spans)
}

/// Simple word-wrapping: split content by newlines first, then wrap long lines.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![];
    }
    let mut result = Vec::new();
    for line in text.lines() {
        if line.chars().count() <= max_width {
            result.push(line.to_string());
        } else {
            let words: Vec<&str> = line.split_whitespace().collect();
            let mut current = String::new();
            for word in words {
                if current.is_empty() {
                    current = word.to_string();
                } else if current.chars().count() + 1 + word.chars().count() <= max_width {
                    current.push(' ');
                    current.push_str(word);
                } else {
                    result.push(current);
                    current = word.to_string();
                }
            }
            if !current.is_empty() {
                result.push(current);
            }
        }
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}
