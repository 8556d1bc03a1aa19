//! Data models for chat-room entities

mod message;
mod user;

pub use message::*;
pub use user::*;
