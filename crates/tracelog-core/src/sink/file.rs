//! JSONL file sink.
//!
//! Each process instance appends to its own file, one self-contained JSON
//! object per line:
//!
//! ```text
//! logs/
//! └── raw/
//!     ├── 2026-01-21_api.jsonl
//!     └── 2026-01-21_worker.jsonl
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::Sink;
use crate::error::{TraceError, TraceResult};
use crate::format::{format_record, format_timestamp};
use crate::types::{LogLevel, LogRecord, SinkKind, Subject};

/// A single line in a JSONL log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileLogEntry {
    /// ISO 8601 timestamp (e.g., "2026-01-21T14:30:45.123Z")
    pub ts: String,

    pub level: LogLevel,

    pub category: String,

    pub msg: String,

    /// User id of the subject, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,

    /// The canonical rendered line
    pub rendered: String,
}

impl FileLogEntry {
    pub fn from_record(record: &LogRecord, subject: Option<&Subject>) -> Self {
        Self {
            ts: format_timestamp(&record.timestamp),
            level: record.level,
            category: record.category.clone(),
            msg: record.message.clone(),
            requested_by: subject.map(|s| s.user_id.clone()),
            rendered: format_record(record, subject),
        }
    }

    /// Serialize to a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from a JSON line.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Sink that appends entries to `<logs_dir>/raw/<date>_<instance>.jsonl`.
pub struct FileSink {
    /// Buffered file writer, flushed after every entry
    writer: Mutex<BufWriter<File>>,

    path: PathBuf,
}

impl FileSink {
    /// Open (or create) today's log file for `instance`.
    pub fn new(logs_dir: impl AsRef<Path>, instance: impl Into<String>) -> TraceResult<Self> {
        let instance = instance.into();
        let raw_dir = logs_dir.as_ref().join("raw");
        fs::create_dir_all(&raw_dir)?;

        let date = chrono::Local::now().format("%Y-%m-%d");
        let path = raw_dir.join(format!("{}_{}.jsonl", date, instance));

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        tracing::debug!(instance = %instance, path = %path.display(), "opened log file");

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &FileLogEntry) -> TraceResult<()> {
        let json = entry
            .to_json_line()
            .map_err(|e| TraceError::Serialization(e.to_string()))?;

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", json)?;
        writer.flush()?;
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.writer.lock().flush();
    }
}

#[async_trait]
impl Sink for FileSink {
    fn kind(&self) -> SinkKind {
        SinkKind::File
    }

    async fn write(&self, record: &LogRecord, subject: Option<&Subject>) -> TraceResult<()> {
        let entry = FileLogEntry::from_record(record, subject);
        self.append(&entry)
            .map_err(|e| TraceError::sink(SinkKind::File, e.to_string()))
    }
}

/// Read every JSONL file under `<logs_dir>/raw`, sorted by timestamp.
///
/// Unparsable lines are skipped.
pub fn read_all_entries(logs_dir: impl AsRef<Path>) -> TraceResult<Vec<FileLogEntry>> {
    let raw_dir = logs_dir.as_ref().join("raw");

    if !raw_dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();

    for dir_entry in fs::read_dir(&raw_dir)? {
        let path = dir_entry?.path();

        if path.extension().map(|e| e == "jsonl").unwrap_or(false) {
            let content = fs::read_to_string(&path)?;
            for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
                match FileLogEntry::from_json_line(line) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping malformed log line");
                    }
                }
            }
        }
    }

    entries.sort_by(|a, b| a.ts.cmp(&b.ts));

    Ok(entries)
}
