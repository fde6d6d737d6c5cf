//! Property-based tests for formatting, dispatch and groups
//!
//! Uses proptest to check the invariants the logger promises for
//! arbitrary inputs and sink outcome mixes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use tracelog_core::{
    format_line, Dispatcher, GroupRegistry, LogLevel, LogRecord, Sink, SinkKind, Subject,
    TraceError, TraceResult,
};

// ============================================================================
// Strategy Generators
// ============================================================================

fn level_strategy() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Info),
        Just(LogLevel::Success),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
    ]
}

fn kind_strategy() -> impl Strategy<Value = SinkKind> {
    prop_oneof![
        Just(SinkKind::Console),
        Just(SinkKind::File),
        Just(SinkKind::PersistentStore),
    ]
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 :/._-]{0,60}").expect("valid regex")
}

fn user_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::string::string_regex("[a-z0-9_]{1,16}").expect("valid regex"))
}

// ============================================================================
// Helpers
// ============================================================================

struct Probe {
    kind: SinkKind,
    succeed: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl Sink for Probe {
    fn kind(&self) -> SinkKind {
        self.kind
    }

    async fn write(&self, _record: &LogRecord, _subject: Option<&Subject>) -> TraceResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            Ok(())
        } else {
            Err(TraceError::sink(self.kind, "probe"))
        }
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Formatting the same tuple twice is byte-identical
    #[test]
    fn format_is_deterministic(
        level in level_strategy(),
        category in text_strategy(),
        message in text_strategy(),
        millis in 0i64..4_000_000_000_000,
        user in user_strategy(),
    ) {
        let ts = Utc.timestamp_millis_opt(millis).unwrap();
        let subject = user.map(Subject::new);
        let a = format_line(level, &category, &message, &ts, subject.as_ref());
        let b = format_line(level, &category, &message, &ts, subject.as_ref());
        prop_assert_eq!(a, b);
    }

    /// The Requested By segment appears exactly when a subject is present
    #[test]
    fn requested_by_iff_subject(
        level in level_strategy(),
        message in text_strategy(),
        user in user_strategy(),
    ) {
        let ts = Utc::now();
        let subject = user.clone().map(Subject::new);
        let line = format_line(level, "Cat", &message, &ts, subject.as_ref());
        match user {
            Some(id) => {
                let expected = format!("[Requested By: {}]", id);
                prop_assert!(line.contains(&expected));
            }
            None => prop_assert!(!line.contains("Requested By")),
        }
        let prefix = format!("[{}] [", level.label());
        prop_assert!(line.starts_with(&prefix));
        let suffix = format!("[Cat] {}", message);
        prop_assert!(line.ends_with(&suffix));
    }

    /// Dispatch is the AND of every targeted sink, and each is called once
    #[test]
    fn dispatch_is_and_of_targets(
        sinks in prop::collection::vec((kind_strategy(), any::<bool>()), 0..8),
        targets in prop::collection::vec(kind_strategy(), 0..4),
    ) {
        let probes: Vec<Arc<Probe>> = sinks
            .iter()
            .map(|(kind, succeed)| Arc::new(Probe {
                kind: *kind,
                succeed: *succeed,
                calls: AtomicUsize::new(0),
            }))
            .collect();
        let dispatcher = Dispatcher::new(
            probes.iter().map(|p| Arc::clone(p) as Arc<dyn Sink>).collect(),
        );

        let record = LogRecord::new(LogLevel::Info, "Prop", "msg");
        let ok = runtime().block_on(dispatcher.dispatch(&record, &targets, None));

        let targeted = |k: SinkKind| targets.is_empty() || targets.contains(&k);
        let expected = probes.iter().filter(|p| targeted(p.kind)).all(|p| p.succeed);
        prop_assert_eq!(ok, expected);

        for probe in &probes {
            let want = if targeted(probe.kind) { 1 } else { 0 };
            prop_assert_eq!(probe.calls.load(Ordering::SeqCst), want);
        }
    }

    /// Group output preserves append order and ends with one terminal line
    #[test]
    fn group_preserves_order(messages in prop::collection::vec("[a-z]{1,12}", 0..20)) {
        let registry = GroupRegistry::new();
        let id = registry.start();
        for (i, m) in messages.iter().enumerate() {
            let msg = format!("{}#{}", i, m);
            prop_assert!(registry.append(&id, LogRecord::new(LogLevel::Info, "Step", msg), None));
        }

        let flushed = registry.close(&id).unwrap();
        let lines: Vec<&str> = flushed.record.message.lines().collect();
        prop_assert_eq!(lines.len(), messages.len() + 1);
        for (i, m) in messages.iter().enumerate() {
            let expected = format!("[Step] {}#{}", i, m);
            prop_assert!(lines[i].ends_with(&expected));
        }
        prop_assert!(lines[messages.len()].contains("[Group] End of"));
        prop_assert!(!registry.is_live(&id));
    }
}
