//! Diagnostics event log.
//!
//! Every failure a handler swallows into a toast is also recorded here so
//! it can be inspected later. One JSON object per line.
//!
//! Log file: `~/.trendlens/events.jsonl`
//!
//! Best-effort: a log that cannot be written is silently skipped.

use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use serde::Serialize;

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Severity of a logged event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// A single diagnostics entry.
#[derive(Debug, Serialize)]
pub struct LogEvent {
    pub timestamp: String,
    pub level: Level,
    /// The operation that produced the event, e.g. `"load_weeks"`.
    pub scope: String,
    pub message: String,
}

/// Turn the file log on or off for this process.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn info(scope: &str, message: &str) {
    log(Level::Info, scope, message);
}

pub fn warn(scope: &str, message: &str) {
    log(Level::Warn, scope, message);
}

pub fn error(scope: &str, message: &str) {
    log(Level::Error, scope, message);
}

pub fn log(level: Level, scope: &str, message: &str) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let event = LogEvent {
        timestamp: Utc::now().to_rfc3339(),
        level,
        scope: scope.to_string(),
        message: message.to_string(),
    };
    let _ = append_event(&event);
}

fn append_event(event: &LogEvent) -> anyhow::Result<()> {
    let Some(path) = events_log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(event)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the events log file.
pub fn events_log_path() -> Option<PathBuf> {
    crate::config::state_dir().map(|dir| dir.join("events.jsonl"))
}
