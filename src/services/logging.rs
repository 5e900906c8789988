//! Logging service - structured event logging
//!
//! Privacy-safe event log for store operations. Passwords and full card
//! numbers are never logged; events carry at most the acting user's email
//! and an error message. Entries are appended as JSON lines to
//! `events.jsonl` in the data directory, or kept in memory for contexts
//! without one.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

const LOG_FILENAME: &str = "events.jsonl";

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique ID based on timestamp + counter
fn generate_id() -> u64 {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    // Lower 48 bits timestamp, upper 16 bits counter
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

/// Get current unix timestamp in milliseconds
fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// A log event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl LogEvent {
    /// Create a new log event with just an event name
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            email: None,
            error_message: None,
        }
    }

    /// Set the acting user's email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set error information
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// A log entry as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

enum Sink {
    File(PathBuf),
    Memory(Mutex<Vec<LogEntry>>),
}

/// Service for structured event logging
pub struct LoggingService {
    sink: Sink,
}

impl LoggingService {
    /// Create a file-backed logging service in the data directory
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        Ok(Self {
            sink: Sink::File(data_dir.join(LOG_FILENAME)),
        })
    }

    /// Create an in-memory logging service (demo/tests)
    pub fn in_memory() -> Self {
        Self {
            sink: Sink::Memory(Mutex::new(Vec::new())),
        }
    }

    /// Log an event
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let entry = LogEntry {
            id: generate_id(),
            timestamp: now_ms(),
            event: event.event,
            email: event.email,
            error_message: event.error_message,
        };

        match &self.sink {
            Sink::File(path) => {
                let mut file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                let line = serde_json::to_string(&entry)?;
                writeln!(file, "{}", line)?;
            }
            Sink::Memory(entries) => {
                entries
                    .lock()
                    .map_err(|e| anyhow!("Lock poisoned: {}", e))?
                    .push(entry);
            }
        }

        Ok(())
    }

    /// Log a simple event with just a name
    pub fn log_event(&self, event: &str) -> Result<()> {
        self.log(LogEvent::new(event))
    }

    /// Log an error
    pub fn log_error(&self, event: &str, message: &str) -> Result<()> {
        self.log(LogEvent::new(event).with_error(message))
    }

    fn all_entries(&self) -> Result<Vec<LogEntry>> {
        match &self.sink {
            Sink::File(path) => {
                if !path.exists() {
                    return Ok(Vec::new());
                }
                let content = std::fs::read_to_string(path)?;
                Ok(content
                    .lines()
                    .filter(|l| !l.trim().is_empty())
                    .filter_map(|l| serde_json::from_str(l).ok())
                    .collect())
            }
            Sink::Memory(entries) => Ok(entries
                .lock()
                .map_err(|e| anyhow!("Lock poisoned: {}", e))?
                .clone()),
        }
    }

    /// Query recent log entries, newest first, up to the specified limit
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries = self.all_entries()?;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Query log entries with errors, newest first
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries = self.all_entries()?;
        entries.retain(|e| e.error_message.is_some());
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Get the total number of log entries
    pub fn count(&self) -> Result<usize> {
        Ok(self.all_entries()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_log_event() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path()).unwrap();

        service.log_event("user_registered").unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "user_registered");
    }

    #[test]
    fn test_log_with_context() {
        let service = LoggingService::in_memory();

        service
            .log(LogEvent::new("deposit_succeeded").with_email("ann@x.com"))
            .unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].email, Some("ann@x.com".to_string()));
    }

    #[test]
    fn test_get_errors_filters() {
        let service = LoggingService::in_memory();

        service.log_event("login_succeeded").unwrap();
        service
            .log_error("deposit_failed", "Card verification failed")
            .unwrap();

        let errors = service.get_errors(10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "deposit_failed");
        assert_eq!(service.count().unwrap(), 2);
    }

    #[test]
    fn test_recent_is_newest_first() {
        let service = LoggingService::in_memory();
        service.log_event("first").unwrap();
        service.log_event("second").unwrap();
        service.log_event("third").unwrap();

        let entries = service.get_recent(2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, "third");
        assert_eq!(entries[1].event, "second");
    }
}
