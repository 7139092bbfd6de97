//! Progress reporting contract between the engine and its caller
//!
//! The engine never talks to a terminal directly. It emits structured
//! events through a [`ProgressSink`]; the CLI decides how to render them
//! (plain lines, progress bar, JSON stream).

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Severity of a progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
}

/// A single structured progress event
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Level::Warn, message)
    }

    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Sink consuming the engine's progress stream
pub trait ProgressSink {
    /// Deliver a structured progress event
    fn event(&mut self, event: ProgressEvent);

    /// Announce how many members are about to be processed
    fn begin(&mut self, _total: u64) {}

    /// One member finished processing
    fn advance(&mut self) {}
}

/// Sink that discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn event(&mut self, _event: ProgressEvent) {}
}

/// Sink that records events in memory for later inspection
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<ProgressEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of all recorded events at the given level
    pub fn messages_at(&self, level: Level) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.as_str())
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn event(&mut self, event: ProgressEvent) {
        self.events.push(event);
    }
}
