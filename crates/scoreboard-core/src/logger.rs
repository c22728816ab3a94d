//! Structured event logging.
//!
//! Flows never print directly; they hand events to a [`Logger`]. The default
//! sink forwards to `tracing`, tests use [`RecordingLogger`].

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Fire-and-forget event sink. Implementations must never panic.
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str, source: &str, detail: Option<&str>);
}

/// Forwards events to the active `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, source: &str, detail: Option<&str>) {
        let detail = detail.unwrap_or_default();
        match level {
            LogLevel::Info => tracing::info!(source, detail, "{message}"),
            LogLevel::Warn => tracing::warn!(source, detail, "{message}"),
            LogLevel::Error => tracing::error!(source, detail, "{message}"),
        }
    }
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub source: String,
    pub detail: Option<String>,
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl RecordingLogger {
    /// Snapshot of everything logged so far.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.events().iter().filter(|e| e.level == level).count()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, message: &str, source: &str, detail: Option<&str>) {
        let event = LogEvent {
            level,
            message: message.to_string(),
            source: source.to_string(),
            detail: detail.map(str::to_string),
        };
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
