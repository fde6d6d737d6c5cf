//! Canonical text rendering shared by every text-producing sink.
//!
//! ```text
//! [INFO] [2026-01-21T14:30:45.123Z] [Requested By: u1] [Server] Running on :8000
//! ```

use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::{LogLevel, LogRecord, Subject};

/// ISO 8601 timestamp with millisecond precision and a `Z` suffix.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render one log line.
///
/// The `Requested By` segment only appears when a subject is given.
pub fn format_line(
    level: LogLevel,
    category: &str,
    message: &str,
    timestamp: &DateTime<Utc>,
    subject: Option<&Subject>,
) -> String {
    let mut line = format!("[{}] [{}]", level.label(), format_timestamp(timestamp));
    if let Some(subject) = subject {
        line.push_str(" [Requested By: ");
        line.push_str(&subject.user_id);
        line.push(']');
    }
    line.push_str(" [");
    line.push_str(category);
    line.push_str("] ");
    line.push_str(message);
    line
}

/// Render a whole record.
pub fn format_record(record: &LogRecord, subject: Option<&Subject>) -> String {
    format_line(
        record.level,
        &record.category,
        &record.message,
        &record.timestamp,
        subject,
    )
}
