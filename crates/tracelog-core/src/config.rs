//! Logger configuration.
//!
//! ```ignore
//! let logger = LoggerConfig::new()
//!     .with_store(data_dir.join("trace_logs.db"))
//!     .with_file("./logs", "api")
//!     .build()?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{TraceError, TraceResult};
use crate::logger::Logger;
use crate::sink::{ConsoleSink, FileSink, Sink, StoreSink};
use crate::storage::TraceLogStore;

/// Default store file name inside the data directory.
pub const STORE_FILE_NAME: &str = "trace_logs.db";

/// Default data directory (`~/.tracelog/data`).
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tracelog")
        .join("data")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSinkConfig {
    pub logs_dir: PathBuf,
    /// Instance name embedded in the file name
    pub instance: String,
}

/// Which sinks to open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub console: bool,
    pub file: Option<FileSinkConfig>,
    /// redb file for the persistent-store sink
    pub store_path: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            file: None,
            store_path: None,
        }
    }
}

impl LoggerConfig {
    /// Console only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_console(mut self) -> Self {
        self.console = false;
        self
    }

    pub fn with_file(mut self, logs_dir: impl Into<PathBuf>, instance: impl Into<String>) -> Self {
        self.file = Some(FileSinkConfig {
            logs_dir: logs_dir.into(),
            instance: instance.into(),
        });
        self
    }

    pub fn with_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> TraceResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| TraceError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Open the configured store, if any.
    pub fn open_store(&self) -> TraceResult<Option<TraceLogStore>> {
        self.store_path
            .as_ref()
            .map(TraceLogStore::new)
            .transpose()
    }

    /// Open every configured sink and return the logger plus the store
    /// handle so the host can query what was written.
    pub fn build_with_store(&self) -> TraceResult<(Logger, Option<TraceLogStore>)> {
        let mut sinks: Vec<Arc<dyn Sink>> = Vec::new();

        if self.console {
            sinks.push(Arc::new(ConsoleSink::stdout()));
        }

        if let Some(file) = &self.file {
            if file.instance.trim().is_empty() {
                return Err(TraceError::Config(
                    "file sink instance name must not be empty".to_string(),
                ));
            }
            sinks.push(Arc::new(FileSink::new(&file.logs_dir, &file.instance)?));
        }

        let store = self.open_store()?;
        if let Some(store) = &store {
            sinks.push(Arc::new(StoreSink::new(store.clone())));
        }

        tracing::debug!(sinks = sinks.len(), "logger configured");
        Ok((Logger::with_sinks(sinks), store))
    }

    pub fn build(&self) -> TraceResult<Logger> {
        self.build_with_store().map(|(logger, _)| logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SinkKind;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_console_only() {
        let logger = LoggerConfig::new().build().unwrap();
        let kinds: Vec<_> = logger.dispatcher().registered_kinds().into_iter().collect();
        assert_eq!(kinds, vec![SinkKind::Console]);
    }

    #[test]
    fn test_build_all_sinks() {
        let temp = TempDir::new().unwrap();
        let (logger, store) = LoggerConfig::new()
            .with_file(temp.path().join("logs"), "api")
            .with_store(temp.path().join("data").join(STORE_FILE_NAME))
            .build_with_store()
            .unwrap();

        assert!(store.is_some());
        assert_eq!(logger.dispatcher().registered_kinds().len(), 3);
    }

    #[test]
    fn test_empty_instance_rejected() {
        let temp = TempDir::new().unwrap();
        let result = LoggerConfig::new().with_file(temp.path(), "  ").build();
        assert!(matches!(result, Err(TraceError::Config(_))));
    }

    #[test]
    fn test_from_json_file_with_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tracelog.json");
        std::fs::write(&path, r#"{ "store_path": "/tmp/x.db" }"#).unwrap();

        let config = LoggerConfig::from_json_file(&path).unwrap();
        assert!(config.console);
        assert!(config.file.is_none());
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/x.db")));
    }

    #[test]
    fn test_from_json_file_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, "{ console: ").unwrap();

        assert!(matches!(
            LoggerConfig::from_json_file(&path),
            Err(TraceError::Config(_))
        ));
    }
}
