//! Core types for tracelog

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::TraceError;

/// Severity of a log record.
///
/// The set is closed: `success` sits alongside the usual levels because
/// callers use it to mark completed operations in the trace log table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl LogLevel {
    /// Every level, in severity order.
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Info,
        LogLevel::Success,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Lowercase name, as stored in the `trace_log_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Uppercase label used in rendered lines
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "success" => Ok(LogLevel::Success),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(TraceError::InvalidLevel(s.to_string())),
        }
    }
}

/// The closed set of destinations a sink can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SinkKind {
    Console,
    File,
    PersistentStore,
}

impl SinkKind {
    /// Every known kind. An empty kind filter expands to this.
    pub const ALL: [SinkKind; 3] = [SinkKind::Console, SinkKind::File, SinkKind::PersistentStore];

    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Console => "console",
            SinkKind::File => "file",
            SinkKind::PersistentStore => "persistent-store",
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SinkKind {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "cli" => Ok(SinkKind::Console),
            "file" => Ok(SinkKind::File),
            "persistent-store" | "store" | "database" => Ok(SinkKind::PersistentStore),
            _ => Err(TraceError::InvalidSinkKind(s.to_string())),
        }
    }
}

/// The authenticated actor a log entry is attributed to.
///
/// Only `user_id` is rendered ("Requested By: ...") and stored as the
/// row initiator; the remaining claims ride along for hosts that bind a
/// request-scoped logger straight from a decoded token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub user_id: String,
    pub session_id: String,
    pub org_id: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub feature_flags: Vec<String>,
    /// Unix seconds
    pub expires_at: i64,
    /// Unix seconds
    pub issued_at: i64,
}

impl Subject {
    /// Create a subject carrying only a user id.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

/// Opaque identifier for a live log group.
///
/// Uses ULID so ids are unique and sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub Ulid);

impl GroupId {
    /// Create a new GroupId with current timestamp
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Convert to string representation (bare ULID)
    pub fn to_string_repr(&self) -> String {
        self.0.to_string()
    }

    /// Parse from a bare ULID or the `group_` display form
    pub fn from_string(s: &str) -> Result<Self, TraceError> {
        let raw = s.strip_prefix("group_").unwrap_or(s);
        Ulid::from_string(raw)
            .map(Self)
            .map_err(|e| TraceError::InvalidId(format!("{}: {}", s, e)))
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group_{}", self.0)
    }
}

/// A single log event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Group id for grouped entries, otherwise a fresh per-call id
    pub id: Ulid,
    pub level: LogLevel,
    pub category: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Create an ungrouped record stamped with the current time.
    pub fn new(level: LogLevel, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::at(level, category, message, Utc::now())
    }

    /// Create an ungrouped record with an explicit timestamp.
    pub fn at(
        level: LogLevel,
        category: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Ulid::new(),
            level,
            category: category.into(),
            message: message.into(),
            timestamp,
        }
    }

    /// Create a record that belongs to `group`.
    pub fn grouped(
        group: GroupId,
        level: LogLevel,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: group.0,
            ..Self::new(level, category, message)
        }
    }
}
