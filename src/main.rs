//! chatroom-cli - Terminal chat-room viewer
//!
//! Loads a static JSON message feed (file or URL) and renders it either as
//! plain stdout lines (`read`) or an interactive TUI (`tui`).

mod config;
mod error;
mod feed;
mod models;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::models::{ChatMessage, MessageKind};
use crate::tui::log_capture::LogSink;

#[derive(Parser)]
#[command(name = "chatroom-cli")]
#[command(about = "Terminal chat-room viewer for static JSON message feeds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Feed path or URL (overrides the config file)
    #[arg(short, long, global = true)]
    feed: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the feed once and print messages to stdout
    Read {
        /// Maximum number of messages to show (most recent)
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Launch the terminal user interface
    Tui,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "info" };

    let mut config = Config::load()?;
    if let Some(feed) = cli.feed {
        config.feed = feed;
    }

    match cli.command {
        Commands::Read { limit } => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| filter.into()),
                )
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .init();

            read_feed(&config, limit).await;
        }
        Commands::Tui => {
            // Route tracing into a memory sink while the alternate screen is
            // active; captured lines are replayed to stderr afterwards.
            let sink = LogSink::new();
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| filter.into()),
                )
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(sink.clone()),
                )
                .init();

            let result = tui::run(&config).await;
            sink.replay_to_stderr();
            result?;
        }
    }

    Ok(())
}

/// Print the feed to stdout. Load failures become a single inline status
/// message rather than a process failure, mirroring the view behavior.
async fn read_feed(config: &Config, limit: usize) {
    let messages = match feed::load_feed(&config.feed).await {
        Ok(messages) => messages,
        Err(e) => {
            tracing::error!("Feed load failed: {}", e);
            println!("Failed to load messages. Please try again.");
            println!("Error: {}", e);
            return;
        }
    };

    if messages.is_empty() {
        println!("No messages found.");
        return;
    }

    let skip = messages.len().saturating_sub(limit);
    for msg in messages.iter().skip(skip) {
        let marker = if msg.is_from(&config.current_user_id) {
            "*"
        } else {
            " "
        };
        println!(
            "{}[{}] {}: {}",
            marker,
            msg.timestamp_display(),
            msg.sender.username,
            summary(msg)
        );
    }
}

/// One-line summary of a message for plain output.
fn summary(msg: &ChatMessage) -> String {
    let caption = msg.message.as_deref().unwrap_or("");
    match &msg.kind {
        MessageKind::Text => caption.to_string(),
        MessageKind::Image => media_summary("[image]", msg.file_url.as_deref(), caption),
        MessageKind::Video => media_summary("[video]", msg.file_url.as_deref(), caption),
        MessageKind::File => {
            let icon = if msg.is_pdf() { "[pdf]" } else { "[file]" };
            let name = msg.file_name.as_deref().unwrap_or("File");
            let mut out = format!("{} {}", icon, name);
            if let Some(size) = msg.file_size.as_deref() {
                out.push_str(&format!(" ({})", size));
            }
            if !caption.is_empty() {
                out.push_str(&format!(" - {}", caption));
            }
            out
        }
        MessageKind::Unknown(raw) => format!("Unsupported message type: {}", raw),
    }
}

fn media_summary(tag: &str, url: Option<&str>, caption: &str) -> String {
    let mut out = format!("{} {}", tag, url.unwrap_or("(no url)"));
    if !caption.is_empty() {
        out.push_str(&format!(" - {}", caption));
    }
    out
}
