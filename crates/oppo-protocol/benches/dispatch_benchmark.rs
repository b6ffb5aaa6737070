//! Benchmarks for the frame dispatch hot path.
//!
//! ## Running the benchmarks
//!
//! ```bash
//! cargo bench -p oppo-protocol
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use oppo_protocol::{dispatch, Command, FrameCodec};

/// Benchmark dispatching the three frame shapes against pending sets of
/// increasing size.
fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for pending_count in [0usize, 1, 8, 32].iter() {
        let mut pending: Vec<Command> = (0..*pending_count)
            .map(|i| Command::Digit((i % 10) as u8))
            .collect();
        pending.push(Command::PowerToggle);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("long_form_reply", pending_count),
            &pending,
            |b, pending| b.iter(|| dispatch(black_box(b"@PWR OK ON\r"), pending)),
        );
        group.bench_with_input(
            BenchmarkId::new("short_form_reply", pending_count),
            &pending,
            |b, pending| b.iter(|| dispatch(black_box(b"@OK\r"), pending)),
        );
        group.bench_with_input(
            BenchmarkId::new("update", pending_count),
            &pending,
            |b, pending| b.iter(|| dispatch(black_box(b"@UTC 001 002 E 00:12:34\r"), pending)),
        );
    }

    group.finish();
}

/// Benchmark splitting a burst of update traffic into frames.
fn bench_frame_codec(c: &mut Criterion) {
    let burst: Vec<u8> = b"@UTC 001 002 E 00:12:34\r".repeat(64);

    let mut group = c.benchmark_group("frame_codec");
    group.throughput(Throughput::Bytes(burst.len() as u64));
    group.bench_function("decode_burst", |b| {
        b.iter(|| {
            let mut codec = FrameCodec::new();
            codec.push(black_box(&burst));
            codec.decode_all()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_frame_codec);
criterion_main!(benches);
