//! Log capture for TUI mode
//!
//! While the alternate screen is active, tracing output would corrupt the
//! ratatui display. This module provides a bounded in-memory sink that
//! implements `MakeWriter`; captured lines are replayed to stderr after the
//! terminal is restored.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

/// Upper bound on retained log lines; oldest lines are dropped first.
const CAPACITY: usize = 200;

/// Thread-safe bounded sink for captured log lines.
#[derive(Clone, Default)]
pub struct LogSink {
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line, evicting the oldest when full. A poisoned mutex is
    /// recovered rather than propagated; logging must not cascade failures.
    fn push(&self, line: String) {
        let mut guard = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        if guard.len() >= CAPACITY {
            guard.pop_front();
        }
        guard.push_back(line);
    }

    /// Remove and return all captured lines, oldest first.
    pub fn drain(&self) -> Vec<String> {
        let mut guard = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        guard.drain(..).collect()
    }

    /// Replay captured lines to stderr (after terminal restore).
    pub fn replay_to_stderr(&self) {
        for line in self.drain() {
            eprintln!("{}", line);
        }
    }
}

/// Line-buffering writer handed out to tracing-subscriber.
pub struct SinkWriter {
    sink: LogSink,
    pending: Vec<u8>,
}

impl SinkWriter {
    fn flush_complete_lines(&mut self) {
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
            self.sink.push(text);
        }
    }
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.flush_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.pending.is_empty() {
            let text = String::from_utf8_lossy(&self.pending).into_owned();
            self.sink.push(text);
            self.pending.clear();
        }
        Ok(())
    }
}

impl Drop for SinkWriter {
    fn drop(&mut self) {
        let _ = Write::flush(self);
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter {
            sink: self.clone(),
            pending: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_writer_splits_lines() {
        let sink = LogSink::new();
        let mut writer = sink.make_writer();
        write!(writer, "first\nsecond\n").unwrap();
        assert_eq!(sink.drain(), vec!["first", "second"]);
    }

    #[test]
    fn test_partial_line_flushes_on_drop() {
        let sink = LogSink::new();
        {
            let mut writer = sink.make_writer();
            write!(writer, "trailing").unwrap();
            assert!(sink.drain().is_empty());
        }
        assert_eq!(sink.drain(), vec!["trailing"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let sink = LogSink::new();
        for i in 0..CAPACITY + 10 {
            sink.push(format!("line {}", i));
        }
        let lines = sink.drain();
        assert_eq!(lines.len(), CAPACITY);
        assert_eq!(lines[0], "line 10");
    }
}
