//! Terminal user interface for the chat room, built on Ratatui.

mod app;
mod backend;
mod compose;
pub mod log_capture;
mod messages;
mod palette;
mod ui;

pub use app::run;
