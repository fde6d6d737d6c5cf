//! In-memory registry of open log groups.
//!
//! A group collects entries between [`GroupRegistry::start`] and
//! [`GroupRegistry::end`]; closing renders them into one block that is
//! dispatched as a single info record. Groups never outlive the process.
//!
//! Locking: the outer map is behind an `RwLock`. `append` holds the read
//! lock plus the group's own mutex, so appends to different groups run in
//! parallel while appends to one group stay FIFO. `end` takes the write
//! lock to remove the group, so every append that reported `true` is in
//! the flushed block.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use crate::dispatch::Dispatcher;
use crate::error::TraceError;
use crate::format::{format_line, format_record};
use crate::types::{GroupId, LogLevel, LogRecord, Subject};

/// Category used for the terminal line and the flushed record.
pub const GROUP_CATEGORY: &str = "Group";

/// One queued entry with the subject captured when it was appended.
#[derive(Debug, Clone)]
struct GroupEntry {
    record: LogRecord,
    subject: Option<Subject>,
}

/// A closed group rendered and ready to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct FlushedGroup {
    /// Single info-level record carrying the whole block as its message
    pub record: LogRecord,
    /// Subject of the last appended entry
    pub subject: Option<Subject>,
    /// Number of appended entries, terminal line excluded
    pub entries: usize,
}

#[derive(Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<GroupId, Mutex<Vec<GroupEntry>>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new empty group.
    pub fn start(&self) -> GroupId {
        let mut groups = self.groups.write();
        let mut id = GroupId::new();
        while groups.contains_key(&id) {
            id = GroupId::new();
        }
        groups.insert(id, Mutex::new(Vec::new()));
        tracing::debug!(group = %id, "log group started");
        id
    }

    /// Queue `record` on a live group. Unknown ids are rejected, never created.
    pub fn append(&self, id: &GroupId, record: LogRecord, subject: Option<Subject>) -> bool {
        let groups = self.groups.read();
        match groups.get(id) {
            Some(queue) => {
                queue.lock().push(GroupEntry { record, subject });
                true
            }
            None => {
                tracing::warn!(group = %id, "append to unknown log group");
                false
            }
        }
    }

    /// Whether `id` is currently open.
    pub fn is_live(&self, id: &GroupId) -> bool {
        self.groups.read().contains_key(id)
    }

    /// Entries queued on `id`, or `None` if it is not open.
    pub fn pending(&self, id: &GroupId) -> Option<usize> {
        self.groups.read().get(id).map(|q| q.lock().len())
    }

    /// Number of open groups.
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove `id` and render its block without dispatching it.
    pub fn close(&self, id: &GroupId) -> Option<FlushedGroup> {
        let entries = match self.groups.write().remove(id) {
            Some(queue) => queue.into_inner(),
            None => {
                let err = TraceError::GroupNotFound(id.to_string());
                tracing::warn!(error = %err, "end of unknown log group");
                return None;
            }
        };

        let last_subject = entries.last().and_then(|e| e.subject.clone());

        let mut lines: Vec<String> = entries
            .iter()
            .map(|e| format_record(&e.record, e.subject.as_ref()))
            .collect();

        let now = Utc::now();
        lines.push(format_line(
            LogLevel::Info,
            GROUP_CATEGORY,
            &format!("End of {} ({} entries)", id, entries.len()),
            &now,
            last_subject.as_ref(),
        ));

        let record = LogRecord {
            id: id.0,
            level: LogLevel::Info,
            category: GROUP_CATEGORY.to_string(),
            message: lines.join("\n"),
            timestamp: now,
        };

        Some(FlushedGroup {
            record,
            subject: last_subject,
            entries: entries.len(),
        })
    }

    /// Close `id` and send its block to every sink.
    ///
    /// The group is gone afterwards whatever the dispatch outcome.
    pub async fn end(&self, id: &GroupId, dispatcher: &Dispatcher) -> bool {
        match self.close(id) {
            Some(flushed) => {
                dispatcher
                    .dispatch(&flushed.record, &[], flushed.subject.as_ref())
                    .await
            }
            None => false,
        }
    }
}
