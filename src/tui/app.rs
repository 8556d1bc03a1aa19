//! TUI Application state and main event loop

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use crate::config::Config;
use crate::models::{ChatMessage, Sender};

use super::backend::{Backend, BackendCommand, BackendResponse};
use super::compose::ComposeState;
use super::messages::MessageListState;
use super::ui;

/// Target frame rate for UI updates (~30 fps)
const FRAME_DURATION_MS: u64 = 33;

/// Chat id attached to locally composed messages.
const LOCAL_CHAT_ID: &str = "chat-room-1";

/// Active pane in the TUI
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Messages,
    #[default]
    Compose,
}

impl Pane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pane::Messages => "messages",
            Pane::Compose => "compose",
        }
    }

    fn next(self) -> Self {
        match self {
            Pane::Messages => Pane::Compose,
            Pane::Compose => Pane::Messages,
        }
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_exit: bool,
    /// Feed path or URL being displayed
    pub feed_source: String,
    /// Identity for composed messages and alignment
    pub sender: Sender,
    /// Message list pane state
    pub list: MessageListState,
    /// Compose box state
    pub compose: ComposeState,
    /// Active pane
    pub active_pane: Pane,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            should_exit: false,
            feed_source: config.feed.clone(),
            sender: config.current_sender(),
            list: MessageListState::new(config.current_user_id.clone()),
            compose: ComposeState::default(),
            active_pane: Pane::default(),
        }
    }

    /// Handle input events and backend responses for one frame.
    pub fn tick(&mut self, backend: &mut Backend) -> Result<()> {
        if event::poll(Duration::from_millis(FRAME_DURATION_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.handle_key(key, backend);
                }
                Event::Resize(_, _) => {
                    // Terminal resized - will be handled on next draw
                }
                _ => {}
            }
        }

        while let Some(resp) = backend.try_recv() {
            match resp {
                BackendResponse::Feed(Ok(messages)) => {
                    tracing::info!("Loaded {} messages", messages.len());
                    self.list.set_messages(messages);
                }
                BackendResponse::Feed(Err(e)) => {
                    self.list.set_failed(e.to_string());
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, backend: &mut Backend) {
        // Global bindings first.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return;
        }
        if key.code == KeyCode::Tab {
            self.active_pane = self.active_pane.next();
            return;
        }

        match self.active_pane {
            Pane::Messages => self.handle_list_key(key, backend),
            Pane::Compose => self.handle_compose_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, backend: &mut Backend) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Char('r') => self.reload(backend),
            KeyCode::Up | KeyCode::Char('k') => self.list.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.scroll_down(1),
            KeyCode::PageUp => self.list.scroll_up(10),
            KeyCode::PageDown => self.list.scroll_down(10),
            KeyCode::Home => self.list.scroll_home(),
            KeyCode::End => self.list.scroll_end(),
            _ => {}
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_message(),
            KeyCode::Backspace => self.compose.backspace(),
            KeyCode::Delete => self.compose.delete(),
            KeyCode::Left => self.compose.move_left(),
            KeyCode::Right => self.compose.move_right(),
            KeyCode::Home => self.compose.move_home(),
            KeyCode::End => self.compose.move_end(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.compose.clear()
            }
            KeyCode::Char(c) => self.compose.insert_char(c),
            _ => {}
        }
    }

    /// Append a locally composed message. No network call, no durability.
    fn submit_message(&mut self) {
        if let Some(text) = self.compose.submit() {
            let msg = ChatMessage::outgoing(LOCAL_CHAT_ID, self.sender.clone(), text);
            tracing::debug!("Composed local message {}", msg.id);
            self.list.push(msg);
        }
    }

    /// Re-issue the single feed fetch (the page-reload analog).
    fn reload(&mut self, backend: &mut Backend) {
        self.list.set_loading();
        backend.send(BackendCommand::LoadFeed {
            source: self.feed_source.clone(),
        });
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut ratatui::Frame) {
        ui::render(frame, self);
    }
}

/// Run the TUI application with panic-safe terminal restore
pub async fn run(config: &Config) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = catch_unwind(AssertUnwindSafe(|| run_app(&mut terminal, config)));
    ratatui::restore();

    match result {
        Ok(r) => r,
        Err(e) => std::panic::resume_unwind(e),
    }
}

fn run_app(terminal: &mut DefaultTerminal, config: &Config) -> Result<()> {
    let mut app = App::new(config);
    let mut backend = Backend::start();

    // Initial load: the one suspension point, awaited by the backend task
    // while the loop shows the loading state.
    app.reload(&mut backend);

    while !app.should_exit {
        terminal.draw(|frame| app.render(frame))?;
        app.tick(&mut backend)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::messages::ListView;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(&Config::default())
    }

    #[test]
    fn test_compose_enter_appends_right_aligned_message() {
        let mut app = app();
        app.list.set_messages(vec![]);

        for c in "hello there".chars() {
            app.handle_compose_key(press(KeyCode::Char(c)));
        }
        app.handle_compose_key(press(KeyCode::Enter));

        assert_eq!(app.list.messages.len(), 1);
        let msg = &app.list.messages[0];
        assert!(msg.is_from("user1"));
        assert_eq!(msg.message.as_deref(), Some("hello there"));
        assert!(app.compose.input.is_empty());
    }

    #[test]
    fn test_blank_compose_appends_nothing() {
        let mut app = app();
        app.list.set_messages(vec![]);

        for c in "   ".chars() {
            app.handle_compose_key(press(KeyCode::Char(c)));
        }
        app.handle_compose_key(press(KeyCode::Enter));

        assert!(app.list.messages.is_empty());
        assert!(app.compose.input.is_empty());
    }

    #[test]
    fn test_tab_cycles_panes() {
        let mut app = app();
        assert_eq!(app.active_pane, Pane::Compose);
        app.active_pane = app.active_pane.next();
        assert_eq!(app.active_pane, Pane::Messages);
        app.active_pane = app.active_pane.next();
        assert_eq!(app.active_pane, Pane::Compose);
    }

    #[test]
    fn test_starts_in_loading_state() {
        let app = app();
        assert!(matches!(app.list.view, ListView::Loading));
        assert_eq!(app.feed_source, crate::config::DEFAULT_FEED);
    }
}
