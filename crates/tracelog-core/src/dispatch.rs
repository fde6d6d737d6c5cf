//! Fan-out of one record to every sink of the requested kinds.
//!
//! All matching sinks run concurrently and are awaited together. A sink
//! that errors or panics contributes `false` without cancelling its
//! siblings; the overall result is the AND of every outcome.

use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::join_all;
use futures::FutureExt;

use crate::sink::Sink;
use crate::types::{LogRecord, SinkKind, Subject};

/// Read-only sink registry plus the fan-out logic.
#[derive(Clone, Default)]
pub struct Dispatcher {
    sinks: Arc<Vec<Arc<dyn Sink>>>,
}

impl Dispatcher {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            sinks: Arc::new(sinks),
        }
    }

    /// Registered sinks, in registration order.
    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.sinks
    }

    /// Kinds with at least one registered sink.
    pub fn registered_kinds(&self) -> BTreeSet<SinkKind> {
        self.sinks.iter().map(|s| s.kind()).collect()
    }

    /// Sinks selected by `kinds`. An empty slice selects every kind.
    pub fn sinks_for(&self, kinds: &[SinkKind]) -> Vec<Arc<dyn Sink>> {
        let wanted: BTreeSet<SinkKind> = if kinds.is_empty() {
            SinkKind::ALL.into_iter().collect()
        } else {
            kinds.iter().copied().collect()
        };

        self.sinks
            .iter()
            .filter(|sink| wanted.contains(&sink.kind()))
            .cloned()
            .collect()
    }

    /// Send `record` to every sink of `kinds` and report whether all succeeded.
    ///
    /// Vacuously `true` when no sink matches.
    pub async fn dispatch(
        &self,
        record: &LogRecord,
        kinds: &[SinkKind],
        subject: Option<&Subject>,
    ) -> bool {
        let targets = self.sinks_for(kinds);

        let calls = targets.iter().map(|sink| async move {
            let kind = sink.kind();
            match AssertUnwindSafe(sink.write(record, subject))
                .catch_unwind()
                .await
            {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    tracing::warn!(sink = %kind, error = %e, "sink failed to log record");
                    false
                }
                Err(_) => {
                    tracing::error!(sink = %kind, "sink panicked while logging record");
                    false
                }
            }
        });

        join_all(calls).await.into_iter().all(|ok| ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TraceError, TraceResult};
    use crate::types::LogLevel;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Succeed,
        Fail,
        Panic,
    }

    struct ProbeSink {
        kind: SinkKind,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl ProbeSink {
        fn new(kind: SinkKind, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                kind,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Sink for ProbeSink {
        fn kind(&self) -> SinkKind {
            self.kind
        }

        async fn write(&self, _record: &LogRecord, _subject: Option<&Subject>) -> TraceResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::Fail => Err(TraceError::sink(self.kind, "probe failure")),
                Behavior::Panic => panic!("probe panic"),
            }
        }
    }

    fn registry(sinks: &[&Arc<ProbeSink>]) -> Dispatcher {
        Dispatcher::new(
            sinks
                .iter()
                .map(|s| Arc::clone(*s) as Arc<dyn Sink>)
                .collect(),
        )
    }

    fn record() -> LogRecord {
        LogRecord::new(LogLevel::Info, "Test", "hello")
    }

    #[tokio::test]
    async fn test_all_succeed() {
        let a = ProbeSink::new(SinkKind::Console, Behavior::Succeed);
        let b = ProbeSink::new(SinkKind::PersistentStore, Behavior::Succeed);
        let dispatcher = registry(&[&a, &b]);

        assert!(dispatcher.dispatch(&record(), &[], None).await);
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_siblings() {
        let a = ProbeSink::new(SinkKind::Console, Behavior::Succeed);
        let b = ProbeSink::new(SinkKind::PersistentStore, Behavior::Fail);
        let c = ProbeSink::new(SinkKind::File, Behavior::Succeed);
        let dispatcher = registry(&[&a, &b, &c]);

        assert!(!dispatcher.dispatch(&record(), &[], None).await);
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
        assert_eq!(c.calls(), 1);
    }

    #[tokio::test]
    async fn test_panicking_sink_counts_as_failure() {
        let a = ProbeSink::new(SinkKind::Console, Behavior::Panic);
        let b = ProbeSink::new(SinkKind::Console, Behavior::Succeed);
        let dispatcher = registry(&[&a, &b]);

        assert!(!dispatcher.dispatch(&record(), &[SinkKind::Console], None).await);
        assert_eq!(b.calls(), 1);
    }

    #[tokio::test]
    async fn test_kind_filter_skips_other_kinds() {
        let console = ProbeSink::new(SinkKind::Console, Behavior::Succeed);
        let store = ProbeSink::new(SinkKind::PersistentStore, Behavior::Fail);
        let dispatcher = registry(&[&console, &store]);

        assert!(!dispatcher
            .dispatch(&record(), &[SinkKind::PersistentStore], None)
            .await);
        assert_eq!(console.calls(), 0);
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_kinds_invoke_once() {
        let console = ProbeSink::new(SinkKind::Console, Behavior::Succeed);
        let dispatcher = registry(&[&console]);

        assert!(dispatcher
            .dispatch(&record(), &[SinkKind::Console, SinkKind::Console], None)
            .await);
        assert_eq!(console.calls(), 1);
    }

    #[tokio::test]
    async fn test_no_matching_sink_is_vacuously_true() {
        let console = ProbeSink::new(SinkKind::Console, Behavior::Fail);
        let dispatcher = registry(&[&console]);

        assert!(dispatcher.dispatch(&record(), &[SinkKind::File], None).await);
        assert_eq!(console.calls(), 0);
        assert!(Dispatcher::default().dispatch(&record(), &[], None).await);
    }

    #[test]
    fn test_registered_kinds() {
        let store = ProbeSink::new(SinkKind::PersistentStore, Behavior::Succeed);
        let console_a = ProbeSink::new(SinkKind::Console, Behavior::Succeed);
        let console_b = ProbeSink::new(SinkKind::Console, Behavior::Succeed);
        let dispatcher = registry(&[&store, &console_a, &console_b]);
        let kinds: Vec<_> = dispatcher.registered_kinds().into_iter().collect();
        assert_eq!(kinds, vec![SinkKind::Console, SinkKind::PersistentStore]);
    }
}
