//! The public logging entry point.
//!
//! ```ignore
//! let logger = Logger::new(dispatcher, Arc::new(GroupRegistry::new()));
//!
//! // Grouped: nothing is written until `end`
//! let id = logger.start();
//! logger.info_with("Server", "Running on :8000", LogOptions::new().in_group(id)).await;
//! logger.end(&id).await;
//!
//! // Console only
//! logger.info_with("Sample", "console line", LogOptions::new().to(&[SinkKind::Console])).await;
//!
//! // Per-request logger carrying the caller's identity
//! let request_logger = logger.bind(subject);
//! request_logger.error("Auth", "token expired").await;
//! ```

use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::group::GroupRegistry;
use crate::sink::Sink;
use crate::types::{GroupId, LogLevel, LogRecord, SinkKind, Subject};

/// Per-call options for a log operation.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Overrides the logger's bound subject for this call
    pub subject: Option<Subject>,
    /// Target sink kinds; empty means every kind.
    /// Ignored when `group` is set: a flushed group goes to every sink.
    pub kinds: Vec<SinkKind>,
    /// Queue on this group instead of dispatching now
    pub group: Option<GroupId>,
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(mut self, kinds: &[SinkKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    pub fn in_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    pub fn as_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }
}

/// Multi-sink logger with grouped batches.
///
/// Cheap to clone; clones share the sink registry and the group registry.
#[derive(Clone)]
pub struct Logger {
    dispatcher: Dispatcher,
    groups: Arc<GroupRegistry>,
    subject: Option<Subject>,
}

impl Logger {
    pub fn new(dispatcher: Dispatcher, groups: Arc<GroupRegistry>) -> Self {
        Self {
            dispatcher,
            groups,
            subject: None,
        }
    }

    /// Logger over `sinks` with its own group registry.
    pub fn with_sinks(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self::new(Dispatcher::new(sinks), Arc::new(GroupRegistry::new()))
    }

    /// A logger that attaches `subject` to every call.
    pub fn bind(&self, subject: Subject) -> Self {
        Self {
            subject: Some(subject),
            ..self.clone()
        }
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    /// Log at `level`. Returns whether every targeted sink succeeded,
    /// or for grouped calls whether the entry was queued.
    pub async fn log(
        &self,
        level: LogLevel,
        category: &str,
        message: &str,
        options: LogOptions,
    ) -> bool {
        let subject = options.subject.or_else(|| self.subject.clone());

        if let Some(group) = options.group {
            if !options.kinds.is_empty() {
                tracing::debug!(
                    group = %group,
                    kinds = ?options.kinds,
                    "sink kinds ignored for grouped entry"
                );
            }
            let record = LogRecord::grouped(group, level, category, message);
            return self.groups.append(&group, record, subject);
        }

        let record = LogRecord::new(level, category, message);
        let ok = self
            .dispatcher
            .dispatch(&record, &options.kinds, subject.as_ref())
            .await;
        if !ok {
            tracing::warn!(category, "failed to log {} record to every sink", level);
        }
        ok
    }

    pub async fn info(&self, category: &str, message: &str) -> bool {
        self.log(LogLevel::Info, category, message, LogOptions::default())
            .await
    }

    pub async fn success(&self, category: &str, message: &str) -> bool {
        self.log(LogLevel::Success, category, message, LogOptions::default())
            .await
    }

    pub async fn warn(&self, category: &str, message: &str) -> bool {
        self.log(LogLevel::Warn, category, message, LogOptions::default())
            .await
    }

    pub async fn error(&self, category: &str, message: &str) -> bool {
        self.log(LogLevel::Error, category, message, LogOptions::default())
            .await
    }

    pub async fn info_with(&self, category: &str, message: &str, options: LogOptions) -> bool {
        self.log(LogLevel::Info, category, message, options).await
    }

    pub async fn success_with(&self, category: &str, message: &str, options: LogOptions) -> bool {
        self.log(LogLevel::Success, category, message, options).await
    }

    pub async fn warn_with(&self, category: &str, message: &str, options: LogOptions) -> bool {
        self.log(LogLevel::Warn, category, message, options).await
    }

    pub async fn error_with(&self, category: &str, message: &str, options: LogOptions) -> bool {
        self.log(LogLevel::Error, category, message, options).await
    }

    /// Open a log group.
    pub fn start(&self) -> GroupId {
        self.groups.start()
    }

    /// Close a log group and dispatch its block to every sink.
    pub async fn end(&self, id: &GroupId) -> bool {
        self.groups.end(id, &self.dispatcher).await
    }
}
