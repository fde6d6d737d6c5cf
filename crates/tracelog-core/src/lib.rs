//! tracelog core library
//!
//! One logger, many destinations. A record is fanned out concurrently to
//! every sink of the requested kinds (console, JSONL file, persistent
//! store) and the caller gets back a single success flag. Entries can also
//! be collected into a group and flushed as one block.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tracelog_core::{LoggerConfig, LogOptions, SinkKind, Subject};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let logger = LoggerConfig::new()
//!         .with_store("./data/trace_logs.db")
//!         .build()?;
//!
//!     // Start-up block, written once at `end`
//!     let id = logger.start();
//!     logger.info_with("Server", "Running on http://localhost:8000", LogOptions::new().in_group(id)).await;
//!     logger.end(&id).await;
//!
//!     // Request-scoped logger
//!     let request_logger = logger.bind(Subject::new("user_01"));
//!     request_logger
//!         .error_with("Auth", "token expired", LogOptions::new().to(&[SinkKind::PersistentStore]))
//!         .await;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod group;
pub mod logger;
pub mod sink;
pub mod storage;
pub mod types;

// Re-exports
pub use config::{default_data_dir, FileSinkConfig, LoggerConfig, STORE_FILE_NAME};
pub use diagnostics::init_diagnostics;
pub use dispatch::Dispatcher;
pub use error::{TraceError, TraceResult};
pub use format::{format_line, format_record, format_timestamp};
pub use group::{FlushedGroup, GroupRegistry, GROUP_CATEGORY};
pub use logger::{LogOptions, Logger};
pub use sink::{read_all_entries, ConsoleSink, FileLogEntry, FileSink, Sink, StoreSink};
pub use storage::{LevelCounts, LogFilter, LogStore, ResourceStatus, TraceLogRow, TraceLogStore};
pub use types::*;
pub use ulid::Ulid;
