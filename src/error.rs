//! Feed error taxonomy

use thiserror::Error;

/// How many characters of a failing response body to keep for diagnostics.
pub const BODY_TRUNCATE: usize = 200;

/// Errors from loading the message feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Non-success HTTP status. `body` is truncated to [`BODY_TRUNCATE`] chars.
    #[error("HTTP error! status: {status}. Response body: {body}")]
    Http { status: u16, body: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to read feed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON in feed: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload is neither an array nor an object with a `data` array.
    #[error("feed is not an array and does not contain a 'data' array (got {found})")]
    Shape { found: &'static str },
}

/// Truncate diagnostic text on a char boundary.
pub fn truncate_body(body: &str) -> String {
    body.chars().take(BODY_TRUNCATE).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_short_unchanged() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn test_truncate_body_caps_length() {
        let long = "x".repeat(500);
        assert_eq!(truncate_body(&long).chars().count(), BODY_TRUNCATE);
    }

    #[test]
    fn test_http_error_message_contains_status() {
        let err = FeedError::Http {
            status: 404,
            body: "not found".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("not found"));
    }
}
