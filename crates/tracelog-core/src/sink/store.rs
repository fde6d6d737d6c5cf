//! Persistent-store sink: one insert per record through a [`LogStore`].

use std::sync::Arc;

use async_trait::async_trait;

use super::Sink;
use crate::error::{TraceError, TraceResult};
use crate::format::format_record;
use crate::storage::LogStore;
use crate::types::{LogRecord, SinkKind, Subject};

/// Renders each record and hands it to the store on the blocking pool.
pub struct StoreSink {
    store: Arc<dyn LogStore>,
}

impl StoreSink {
    pub fn new(store: impl LogStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

#[async_trait]
impl Sink for StoreSink {
    fn kind(&self) -> SinkKind {
        SinkKind::PersistentStore
    }

    async fn write(&self, record: &LogRecord, subject: Option<&Subject>) -> TraceResult<()> {
        let content = format_record(record, subject);
        let category = record.category.clone();
        let level = record.level;
        let initiator = subject.map(|s| s.user_id.clone());
        let store = Arc::clone(&self.store);

        let result = tokio::task::spawn_blocking(move || {
            store.insert_log_record(&category, &content, level, initiator.as_deref())
        })
        .await
        .map_err(|e| TraceError::sink(SinkKind::PersistentStore, e.to_string()))
        .and_then(|inner| inner);

        if let Err(ref e) = result {
            tracing::error!(error = %e, "error logging {} to persistent store", level);
        }
        result.map_err(|e| match e {
            e @ TraceError::Sink { .. } => e,
            other => TraceError::sink(SinkKind::PersistentStore, other.to_string()),
        })
    }
}
