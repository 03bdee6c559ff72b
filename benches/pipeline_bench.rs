//! Benchmarks for timestamp-sidecar
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_queue_operations(c: &mut Criterion) {
    use timestamp_sidecar::walker::queue::{FileTask, WorkQueue};

    c.bench_function("queue_send_recv", |b| {
        let (queue, sender) = WorkQueue::new(None);
        let receiver = queue.receiver();

        b.iter(|| {
            sender.send(FileTask::new("/test/path/file.dat")).unwrap();
            let received = receiver.try_recv().unwrap();
            black_box(received);
        })
    });
}

fn benchmark_codec(c: &mut Criterion) {
    use chrono::{TimeZone, Utc};
    use timestamp_sidecar::sidecar::TimestampTriple;

    let triple = TimestampTriple {
        creation: Utc.timestamp_opt(1_500_000_000, 123_456_789).unwrap(),
        last_write: Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
        last_access: Utc.timestamp_opt(1_700_000_000, 999).unwrap(),
    };
    let encoded = triple.encode().unwrap();

    c.bench_function("sidecar_encode", |b| {
        b.iter(|| black_box(triple.encode().unwrap()))
    });

    c.bench_function("sidecar_decode", |b| {
        b.iter(|| black_box(TimestampTriple::decode(&encoded).unwrap()))
    });
}

fn benchmark_create_run(c: &mut Criterion) {
    use timestamp_sidecar::config::{Mode, RunConfig};
    use timestamp_sidecar::walker::RunCoordinator;

    let dir = tempfile::tempdir().unwrap();
    for i in 0..500 {
        let sub = dir.path().join(format!("d{}", i % 10));
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(sub.join(format!("f{i}")), b"x").unwrap();
    }

    c.bench_function("create_500_files", |b| {
        b.iter(|| {
            let config = RunConfig::new(Mode::Create, dir.path()).workers(8);
            black_box(RunCoordinator::new(config).run().unwrap())
        })
    });
}

criterion_group!(
    benches,
    benchmark_queue_operations,
    benchmark_codec,
    benchmark_create_run
);
criterion_main!(benches);
