//! Log destinations.
//!
//! A sink belongs to exactly one [`SinkKind`] and reports each write as a
//! `TraceResult`. The dispatcher only ever talks to sinks through the
//! [`Sink`] trait.

use async_trait::async_trait;

use crate::error::TraceResult;
use crate::types::{LogLevel, LogRecord, SinkKind, Subject};

pub mod console;
pub mod file;
pub mod store;

pub use console::ConsoleSink;
pub use file::{read_all_entries, FileLogEntry, FileSink};
pub use store::StoreSink;

/// A logging destination.
#[async_trait]
pub trait Sink: Send + Sync {
    /// The kind this sink is registered under.
    fn kind(&self) -> SinkKind;

    /// Persist or display one record.
    async fn write(&self, record: &LogRecord, subject: Option<&Subject>) -> TraceResult<()>;

    async fn info(&self, category: &str, message: &str, subject: Option<&Subject>) -> TraceResult<()> {
        self.write(&LogRecord::new(LogLevel::Info, category, message), subject)
            .await
    }

    async fn success(
        &self,
        category: &str,
        message: &str,
        subject: Option<&Subject>,
    ) -> TraceResult<()> {
        self.write(&LogRecord::new(LogLevel::Success, category, message), subject)
            .await
    }

    async fn warn(&self, category: &str, message: &str, subject: Option<&Subject>) -> TraceResult<()> {
        self.write(&LogRecord::new(LogLevel::Warn, category, message), subject)
            .await
    }

    async fn error(
        &self,
        category: &str,
        message: &str,
        subject: Option<&Subject>,
    ) -> TraceResult<()> {
        self.write(&LogRecord::new(LogLevel::Error, category, message), subject)
            .await
    }
}
