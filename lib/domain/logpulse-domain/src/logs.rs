//! Log records and the bounded most-recent-first log buffer.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of records retained by [`LogBuffer`].
pub const DEFAULT_LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One synthetic log event. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub service: String,
    pub message: String,
}

impl LogRecord {
    pub fn new(
        id: Uuid,
        timestamp: DateTime<Utc>,
        level: LogLevel,
        service: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            timestamp,
            level,
            service: service.into(),
            message: message.into(),
        }
    }
}

/// Bounded log history ordered newest first.
///
/// [`LogBuffer::push`] returns a new buffer and leaves `self` untouched, so a
/// snapshot that holds an older buffer keeps seeing exactly what it saw when
/// it was published. Records are shared between generations through `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogBuffer {
    records: VecDeque<Arc<LogRecord>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    /// Prepend `record`, dropping the oldest entries beyond capacity.
    pub fn push(&self, record: LogRecord) -> Self {
        let mut records = self.records.clone();
        records.push_front(Arc::new(record));
        records.truncate(self.capacity);
        Self {
            records,
            capacity: self.capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn newest(&self) -> Option<&LogRecord> {
        self.records.front().map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogRecord> {
        self.records.iter().map(Arc::as_ref)
    }

    /// Owned copies of the `limit` most recent records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<LogRecord> {
        self.iter().take(limit).cloned().collect()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(n: u128) -> LogRecord {
        LogRecord::new(
            Uuid::from_u128(n),
            Utc.timestamp_opt(1_700_000_000 + n as i64, 0).unwrap(),
            LogLevel::Info,
            "auth-service",
            format!("event {n}"),
        )
    }

    #[test]
    fn test_push_keeps_newest_first() {
        let buffer = LogBuffer::new(5).push(record(1)).push(record(2));
        let ids: Vec<_> = buffer.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
        assert_eq!(buffer.newest().map(|r| r.id), Some(Uuid::from_u128(2)));
    }

    #[test]
    fn test_length_is_min_of_pushes_and_capacity() {
        let mut buffer = LogBuffer::default();
        for n in 1..=250u128 {
            buffer = buffer.push(record(n));
            assert_eq!(buffer.len(), (n as usize).min(DEFAULT_LOG_CAPACITY));
            assert_eq!(buffer.newest().map(|r| r.id), Some(Uuid::from_u128(n)));
        }
        // oldest surviving record is #51
        assert_eq!(buffer.iter().last().map(|r| r.id), Some(Uuid::from_u128(51)));
    }

    #[test]
    fn test_push_leaves_previous_generation_untouched() {
        let first = LogBuffer::new(2).push(record(1)).push(record(2));
        let second = first.push(record(3));
        assert_eq!(first.len(), 2);
        assert_eq!(first.newest().map(|r| r.id), Some(Uuid::from_u128(2)));
        assert_eq!(second.newest().map(|r| r.id), Some(Uuid::from_u128(3)));
        assert_eq!(second.iter().last().map(|r| r.id), Some(Uuid::from_u128(2)));
    }

    #[test]
    fn test_recent_takes_newest() {
        let mut buffer = LogBuffer::default();
        for n in 1..=75u128 {
            buffer = buffer.push(record(n));
        }
        let recent = buffer.recent(50);
        assert_eq!(recent.len(), 50);
        assert_eq!(recent[0].id, Uuid::from_u128(75));
        assert_eq!(recent[49].id, Uuid::from_u128(26));
    }

    #[test]
    fn test_level_serializes_upper_case() {
        let json = serde_json::to_string(&LogLevel::Warn).unwrap();
        assert_eq!(json, "\"WARN\"");
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }
}
