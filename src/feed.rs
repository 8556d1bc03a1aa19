//! Message feed loader
//!
//! Fetches the configured JSON document exactly once (local file or HTTP URL)
//! and normalizes the two accepted payload shapes -- a bare array, or an
//! object wrapping the array in a `data` field -- into a flat message list.

use serde_json::Value;

use crate::error::{truncate_body, FeedError};
use crate::models::ChatMessage;

/// Load the feed from a path or http(s) URL.
///
/// No retry, no caching: one fetch per call. Records that fail to
/// deserialize are skipped with a warning instead of failing the feed.
pub async fn load_feed(source: &str) -> Result<Vec<ChatMessage>, FeedError> {
    tracing::debug!("Loading feed from {}", source);

    let payload = if is_url(source) {
        fetch_url(source).await?
    } else {
        let text = tokio::fs::read_to_string(source).await?;
        serde_json::from_str(&text)?
    };

    normalize(payload)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// GET the feed URL, turning a non-success status into a diagnostic error
/// carrying the status code and the truncated response body.
async fn fetch_url(url: &str) -> Result<Value, FeedError> {
    let resp = reqwest::Client::new().get(url).send().await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FeedError::Http {
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Flatten the payload into message records, in document order.
fn normalize(payload: Value) -> Result<Vec<ChatMessage>, FeedError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(FeedError::Shape {
                    found: "an object without a 'data' array",
                })
            }
        },
        other => {
            return Err(FeedError::Shape {
                found: json_type_name(&other),
            })
        }
    };

    let mut messages = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<ChatMessage>(item) {
            Ok(msg) => messages.push(msg),
            Err(e) => tracing::warn!("Skipping malformed message record: {}", e),
        }
    }
    Ok(messages)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, text: &str) -> Value {
        json!({
            "id": id,
            "chat_id": "chat-room-1",
            "sender": {"id": "user2", "username": "Bob"},
            "message": text,
            "type": "text",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    #[test]
    fn test_normalize_bare_array_and_wrapped_agree() {
        let bare = normalize(json!([record("1", "hi"), record("2", "yo")])).unwrap();
        let wrapped =
            normalize(json!({"data": [record("1", "hi"), record("2", "yo")]})).unwrap();

        assert_eq!(bare.len(), 2);
        assert_eq!(bare.len(), wrapped.len());
        for (a, b) in bare.iter().zip(&wrapped) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.message, b.message);
        }
    }

    #[test]
    fn test_normalize_preserves_document_order() {
        let msgs = normalize(json!([record("1", "a"), record("2", "b"), record("3", "c")]))
            .unwrap();
        let ids: Vec<&str> = msgs.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_normalize_rejects_other_shapes() {
        assert!(matches!(
            normalize(json!("hello")),
            Err(FeedError::Shape { found: "a string" })
        ));
        assert!(matches!(normalize(json!(42)), Err(FeedError::Shape { .. })));
        assert!(matches!(
            normalize(json!({"messages": []})),
            Err(FeedError::Shape { .. })
        ));
        assert!(matches!(
            normalize(json!({"data": "not an array"})),
            Err(FeedError::Shape { .. })
        ));
    }

    #[test]
    fn test_normalize_skips_malformed_records() {
        // Second record has no sender at all and cannot deserialize.
        let msgs = normalize(json!([record("1", "hi"), {"id": "2"}, record("3", "yo")]))
            .unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].id, "1");
        assert_eq!(msgs[1].id, "3");
    }

    #[test]
    fn test_normalize_empty_array() {
        assert!(normalize(json!([])).unwrap().is_empty());
        assert!(normalize(json!({"data": []})).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_feed_from_file() {
        let path = std::env::temp_dir().join(format!(
            "chatroom-feed-test-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, json!([record("1", "hi")]).to_string()).unwrap();

        let msgs = load_feed(path.to_str().unwrap()).await.unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].sender.username, "Bob");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_load_feed_missing_file_is_io_error() {
        let err = load_feed("/nonexistent/feed.json").await.unwrap_err();
        assert!(matches!(err, FeedError::Io(_)));
    }
}
