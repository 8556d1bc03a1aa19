//! Message-related models

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::user::Sender;

/// Message content kind.
///
/// Closed variant set: anything outside the four known wire strings lands in
/// `Unknown` with the raw string preserved, so rendering can show it verbatim
/// instead of silently dropping the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    File,
    Unknown(String),
}

impl Default for MessageKind {
    fn default() -> Self {
        MessageKind::Text
    }
}

impl From<String> for MessageKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => MessageKind::Text,
            "image" => MessageKind::Image,
            "video" => MessageKind::Video,
            "file" => MessageKind::File,
            _ => MessageKind::Unknown(s),
        }
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Text => "text".to_string(),
            MessageKind::Image => "image".to_string(),
            MessageKind::Video => "video".to_string(),
            MessageKind::File => "file".to_string(),
            MessageKind::Unknown(raw) => raw,
        }
    }
}

/// Chat message as it appears in the feed.
///
/// Which optional fields are meaningful depends on `kind`; missing fields
/// fall back to defaults rather than failing the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub chat_id: String,
    pub sender: Sender,
    /// Text body, or caption for media kinds.
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub is_read: bool,
}

impl ChatMessage {
    /// Build an ephemeral outgoing text message from the current user.
    ///
    /// Synthetic time-based id, current timestamp, never persisted.
    pub fn outgoing(chat_id: &str, sender: Sender, text: String) -> Self {
        let now = Utc::now();
        Self {
            id: format!("msg-{}", now.timestamp_millis()),
            chat_id: chat_id.to_string(),
            sender,
            message: Some(text),
            kind: MessageKind::Text,
            created_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            file_url: None,
            thumbnail_url: None,
            file_name: None,
            file_size: None,
            is_read: false,
        }
    }

    /// Whether this message was sent by the given user id.
    pub fn is_from(&self, user_id: &str) -> bool {
        self.sender.id == user_id
    }

    /// `HH:MM` display form of `created_at`, or the raw string when it does
    /// not parse as RFC 3339. Formatted in the timestamp's own offset so the
    /// output is deterministic.
    pub fn timestamp_display(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.created_at) {
            Ok(dt) => dt.format("%H:%M").to_string(),
            Err(_) => self.created_at.clone(),
        }
    }

    /// PDF attachments get a distinct icon; decided by the file URL suffix.
    pub fn is_pdf(&self) -> bool {
        self.file_url
            .as_deref()
            .map(|u| u.to_lowercase().ends_with(".pdf"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_message() {
        let json = r#"{"id":"1","sender":{"id":"user2","username":"Bob"},
            "message":"hi","type":"text","created_at":"2024-01-01T00:00:00Z"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.kind, MessageKind::Text);
        assert_eq!(msg.sender.username, "Bob");
        assert_eq!(msg.message.as_deref(), Some("hi"));
        assert!(!msg.is_from("user1"));
        assert!(msg.is_from("user2"));
    }

    #[test]
    fn test_unknown_kind_preserves_raw_string() {
        let json = r#"{"id":"1","sender":{"id":"u","username":"x"},
            "type":"sticker","created_at":""}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.kind, MessageKind::Unknown("sticker".to_string()));
    }

    #[test]
    fn test_missing_type_defaults_to_text() {
        let json = r#"{"id":"1","sender":{"id":"u","username":"x"}}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.kind, MessageKind::Text);
        assert!(msg.message.is_none());
        assert!(!msg.is_read);
    }

    #[test]
    fn test_kind_round_trips() {
        for raw in ["text", "image", "video", "file", "gif"] {
            let kind = MessageKind::from(raw.to_string());
            assert_eq!(String::from(kind), raw);
        }
    }

    #[test]
    fn test_timestamp_display() {
        let mut msg = ChatMessage::outgoing("c", sender(), "hi".to_string());
        msg.created_at = "2024-01-01T09:05:00Z".to_string();
        assert_eq!(msg.timestamp_display(), "09:05");

        msg.created_at = "not a timestamp".to_string();
        assert_eq!(msg.timestamp_display(), "not a timestamp");
    }

    #[test]
    fn test_outgoing_message() {
        let msg = ChatMessage::outgoing("chat-room-1", sender(), "hello".to_string());
        assert!(msg.id.starts_with("msg-"));
        assert_eq!(msg.chat_id, "chat-room-1");
        assert_eq!(msg.kind, MessageKind::Text);
        assert_eq!(msg.message.as_deref(), Some("hello"));
        assert!(!msg.is_read);
        // Timestamp must be valid RFC 3339 so it renders as HH:MM.
        assert!(chrono::DateTime::parse_from_rfc3339(&msg.created_at).is_ok());
    }

    #[test]
    fn test_is_pdf_by_url_suffix() {
        let mut msg = ChatMessage::outgoing("c", sender(), String::new());
        msg.file_url = Some("https://example.com/report.PDF".to_string());
        assert!(msg.is_pdf());
        msg.file_url = Some("https://example.com/archive.zip".to_string());
        assert!(!msg.is_pdf());
        msg.file_url = None;
        assert!(!msg.is_pdf());
    }

    fn sender() -> Sender {
        Sender {
            id: "user1".to_string(),
            username: "You".to_string(),
            avatar: None,
        }
    }
}
