//! Configuration storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default feed location relative to the working directory.
pub const DEFAULT_FEED: &str = "data/chat_room.json";

/// Fixed identity used to decide message alignment; not authenticated.
pub const DEFAULT_USER_ID: &str = "user1";

/// Display name attached to locally composed messages.
pub const DEFAULT_USERNAME: &str = "You";

/// Application configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Feed location: filesystem path or http(s) URL.
    pub feed: String,
    /// Id of the current user (right-aligned messages).
    pub current_user_id: String,
    /// Username attached to composed messages.
    pub username: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed: DEFAULT_FEED.to_string(),
            current_user_id: DEFAULT_USER_ID.to_string(),
            username: DEFAULT_USERNAME.to_string(),
        }
    }
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "chatroom-cli", "chatroom-cli")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// The sender identity for locally composed messages.
    pub fn current_sender(&self) -> crate::models::Sender {
        crate::models::Sender {
            id: self.current_user_id.clone(),
            username: self.username.clone(),
            avatar: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.feed, DEFAULT_FEED);
        assert_eq!(cfg.current_user_id, "user1");
        assert_eq!(cfg.username, "You");
    }

    #[test]
    fn test_toml_round_trip() {
        let cfg = Config {
            feed: "https://example.com/feed.json".to_string(),
            current_user_id: "u-42".to_string(),
            username: "Alice".to_string(),
        };
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.feed, cfg.feed);
        assert_eq!(back.current_user_id, cfg.current_user_id);
        assert_eq!(back.username, cfg.username);
    }

    #[test]
    fn test_current_sender_has_no_avatar() {
        let sender = Config::default().current_sender();
        assert_eq!(sender.id, "user1");
        assert!(sender.avatar.is_none());
    }
}
