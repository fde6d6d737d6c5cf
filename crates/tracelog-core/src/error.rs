//! Error types for tracelog

use thiserror::Error;

/// Main error type for tracelog operations
///
/// Public logger operations never return this; it flows between the
/// store, the sinks and the configuration layer and is converted to a
/// `false` outcome plus a diagnostic at the dispatch boundary.
#[derive(Error, Debug)]
pub enum TraceError {
    /// Group id is not live in the registry
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// Trace log row was not found in the store
    #[error("Trace log not found: {0}")]
    LogNotFound(String),

    /// A sink reported a failure
    #[error("Sink error ({kind}): {message}")]
    Sink { kind: String, message: String },

    /// Unknown log level name
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Unknown sink kind name
    #[error("Invalid sink kind: {0}")]
    InvalidSinkKind(String),

    /// Malformed id string
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Bad configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error during storage operations (redb)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database creation/opening error
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// Table error
    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    /// Storage operation error
    #[error("Storage operation error: {0}")]
    StorageOp(#[from] redb::StorageError),

    /// Commit error
    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// Error during serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    /// Build a sink failure for the given sink kind.
    pub fn sink(kind: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Sink {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias using TraceError
pub type TraceResult<T> = Result<T, TraceError>;
