//! Console sink: one rendered line per record on the operator console.

use std::io::Write;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::Sink;
use crate::error::{TraceError, TraceResult};
use crate::format::format_record;
use crate::types::{LogRecord, SinkKind, Subject};

/// Writes rendered lines to stdout, or to any writer supplied by the host.
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Console sink on process stdout.
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// Console sink on an arbitrary writer.
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

#[async_trait]
impl Sink for ConsoleSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }

    async fn write(&self, record: &LogRecord, subject: Option<&Subject>) -> TraceResult<()> {
        let line = format_record(record, subject);
        let mut out = self.out.lock();
        writeln!(out, "{}", line)
            .and_then(|_| out.flush())
            .map_err(|e| TraceError::sink(SinkKind::Console, e.to_string()))
    }
}
