//! Persistent trace log storage using redb.
//!
//! [`LogStore`] is the collaborator contract the persistent-store sink
//! writes through. [`TraceLogStore`] is the bundled implementation; rows
//! are keyed by ULID so iteration order is creation order.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};
use ulid::{Generator, Ulid};

use crate::error::{TraceError, TraceResult};
use crate::types::LogLevel;

/// Table for trace log rows (key: ULID string, value: postcard TraceLogRow)
const TRACE_LOGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("trace_logs");

/// Author recorded when a row has no initiator.
pub const SYSTEM_AUTHOR: &str = "System";

/// Insert contract consumed by the persistent-store sink.
///
/// Implementations must report failures as `Err` and be safe for the
/// caller to retry; the sink itself never retries.
pub trait LogStore: Send + Sync + 'static {
    fn insert_log_record(
        &self,
        category: &str,
        rendered_content: &str,
        level: LogLevel,
        initiator_id: Option<&str>,
    ) -> TraceResult<()>;
}

/// Soft-delete state of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Active,
    Inactive,
}

/// One stored trace log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceLogRow {
    pub trace_log_id: Ulid,
    /// Category the entry was logged under
    pub trace_log_name: String,
    pub trace_log_type: LogLevel,
    /// Rendered line (or rendered group block)
    pub content: String,
    pub request_initiator: Option<String>,
    pub resource_status: ResourceStatus,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_at: DateTime<Utc>,
    pub modified_by: Option<String>,
}

impl TraceLogRow {
    fn new(
        id: Ulid,
        category: &str,
        content: &str,
        level: LogLevel,
        initiator: Option<&str>,
    ) -> Self {
        let now = Utc::now();
        Self {
            trace_log_id: id,
            trace_log_name: category.to_string(),
            trace_log_type: level,
            content: content.to_string(),
            request_initiator: initiator.map(str::to_string),
            resource_status: ResourceStatus::Active,
            created_at: now,
            created_by: initiator.unwrap_or(SYSTEM_AUTHOR).to_string(),
            modified_at: now,
            modified_by: initiator.map(str::to_string),
        }
    }
}

/// Filter for [`TraceLogStore::list_logs`].
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub level: Option<LogLevel>,
    pub category: Option<String>,
    /// Include rows archived with [`ResourceStatus::Inactive`]
    pub include_inactive: bool,
    /// Maximum number of rows (newest first)
    pub limit: Option<usize>,
}

impl LogFilter {
    fn matches(&self, row: &TraceLogRow) -> bool {
        self.level.map_or(true, |l| row.trace_log_type == l)
            && self
                .category
                .as_deref()
                .map_or(true, |c| row.trace_log_name == c)
            && (self.include_inactive || row.resource_status == ResourceStatus::Active)
    }
}

/// Row counts per level.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LevelCounts {
    pub total: usize,
    pub info: usize,
    pub success: usize,
    pub warn: usize,
    pub error: usize,
}

/// redb-backed trace log table.
#[derive(Clone)]
pub struct TraceLogStore {
    db: Arc<RwLock<Database>>,
    // Monotonic within a millisecond so key order stays insert order
    ids: Arc<Mutex<Generator>>,
}

impl TraceLogStore {
    /// Open or create the store at `path`, creating parent directories.
    pub fn new(path: impl AsRef<Path>) -> TraceResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TRACE_LOGS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            ids: Arc::new(Mutex::new(Generator::new())),
        })
    }

    fn save_row(&self, row: &TraceLogRow) -> TraceResult<()> {
        let db = self.db.read();
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(TRACE_LOGS_TABLE)?;
            let data = postcard::to_allocvec(row)
                .map_err(|e| TraceError::Serialization(e.to_string()))?;
            let key = row.trace_log_id.to_string();
            table.insert(key.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Insert a row and return it.
    pub fn insert(
        &self,
        category: &str,
        content: &str,
        level: LogLevel,
        initiator: Option<&str>,
    ) -> TraceResult<TraceLogRow> {
        let id = self.ids.lock().generate().unwrap_or_else(|_| Ulid::new());
        let row = TraceLogRow::new(id, category, content, level, initiator);
        self.save_row(&row)?;
        Ok(row)
    }

    /// Load a single row by id.
    pub fn get_log(&self, id: &Ulid) -> TraceResult<Option<TraceLogRow>> {
        let db = self.db.read();
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(TRACE_LOGS_TABLE)?;
        let key = id.to_string();

        match table.get(key.as_str())? {
            Some(v) => {
                let row: TraceLogRow = postcard::from_bytes(v.value())
                    .map_err(|e| TraceError::Serialization(e.to_string()))?;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    /// List rows newest first.
    pub fn list_logs(&self, filter: &LogFilter) -> TraceResult<Vec<TraceLogRow>> {
        let db = self.db.read();
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(TRACE_LOGS_TABLE)?;

        let limit = filter.limit.unwrap_or(usize::MAX);
        let mut rows = Vec::new();
        for entry in table.iter()?.rev() {
            if rows.len() >= limit {
                break;
            }
            let (_, value) = entry?;
            let row: TraceLogRow = postcard::from_bytes(value.value())
                .map_err(|e| TraceError::Serialization(e.to_string()))?;
            if filter.matches(&row) {
                rows.push(row);
            }
        }
        Ok(rows)
    }

    /// Change a row's status, stamping `modified_at`/`modified_by`.
    pub fn set_status(
        &self,
        id: &Ulid,
        status: ResourceStatus,
        modified_by: Option<&str>,
    ) -> TraceResult<TraceLogRow> {
        let mut row = self
            .get_log(id)?
            .ok_or_else(|| TraceError::LogNotFound(id.to_string()))?;
        row.resource_status = status;
        row.modified_at = Utc::now();
        row.modified_by = modified_by.map(str::to_string);
        self.save_row(&row)?;
        Ok(row)
    }

    /// Count active rows per level.
    pub fn count_by_level(&self) -> TraceResult<LevelCounts> {
        let rows = self.list_logs(&LogFilter::default())?;
        let mut counts = LevelCounts {
            total: rows.len(),
            ..Default::default()
        };
        for row in &rows {
            match row.trace_log_type {
                LogLevel::Info => counts.info += 1,
                LogLevel::Success => counts.success += 1,
                LogLevel::Warn => counts.warn += 1,
                LogLevel::Error => counts.error += 1,
            }
        }
        Ok(counts)
    }

    /// Number of rows in the table, archived ones included.
    pub fn len(&self) -> TraceResult<u64> {
        let db = self.db.read();
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(TRACE_LOGS_TABLE)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> TraceResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl LogStore for TraceLogStore {
    fn insert_log_record(
        &self,
        category: &str,
        rendered_content: &str,
        level: LogLevel,
        initiator_id: Option<&str>,
    ) -> TraceResult<()> {
        self.insert(category, rendered_content, level, initiator_id)
            .map(|_| ())
    }
}
