//! Benchmarks for tracelog formatting, dispatch and group flushing
//!
//! Run with: cargo bench -p tracelog-core

use std::sync::Arc;

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tracelog_core::{
    format_line, Dispatcher, GroupRegistry, LogLevel, LogRecord, Sink, SinkKind, Subject,
    TraceResult,
};

struct NullSink(SinkKind);

#[async_trait]
impl Sink for NullSink {
    fn kind(&self) -> SinkKind {
        self.0
    }

    async fn write(&self, record: &LogRecord, _subject: Option<&Subject>) -> TraceResult<()> {
        black_box(record);
        Ok(())
    }
}

fn bench_format(c: &mut Criterion) {
    let subject = Subject::new("user_01");
    let ts = chrono::Utc::now();
    c.bench_function("format_line_with_subject", |b| {
        b.iter(|| {
            black_box(format_line(
                LogLevel::Info,
                "Server",
                "Running on http://localhost:8000",
                &ts,
                Some(&subject),
            ))
        })
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("dispatch");

    for count in [1usize, 4, 16] {
        let sinks: Vec<Arc<dyn Sink>> = (0..count)
            .map(|i| Arc::new(NullSink(SinkKind::ALL[i % 3])) as Arc<dyn Sink>)
            .collect();
        let dispatcher = Dispatcher::new(sinks);
        let record = LogRecord::new(LogLevel::Warn, "Bench", "payload");

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.to_async(&rt)
                .iter(|| async { black_box(dispatcher.dispatch(&record, &[], None).await) })
        });
    }

    group.finish();
}

fn bench_group_flush(c: &mut Criterion) {
    c.bench_function("group_close_100_entries", |b| {
        b.iter_batched(
            || {
                let registry = GroupRegistry::new();
                let id = registry.start();
                for i in 0..100 {
                    registry.append(
                        &id,
                        LogRecord::new(LogLevel::Info, "Step", format!("step {}", i)),
                        None,
                    );
                }
                (registry, id)
            },
            |(registry, id)| black_box(registry.close(&id)),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_format, bench_dispatch, bench_group_flush);
criterion_main!(benches);
