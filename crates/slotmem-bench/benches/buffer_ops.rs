//! Criterion micro-benchmarks for the bump allocator and the ring buffer.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use slotmem_arena::{ByteArena, RingBuffer};

/// Benchmark: 1024 × 48-byte bump allocations, then reset.
fn bench_bump_alloc(c: &mut Criterion) {
    let mut bump = ByteArena::new(64 * 1024);
    c.bench_function("bump_alloc_1024x48", |b| {
        b.iter(|| {
            for _ in 0..1024 {
                black_box(bump.alloc(48).unwrap().0);
            }
            bump.clear();
        });
    });
}

/// Benchmark: push 4 KiB through a 1 KiB ring in 100-byte chunks, forcing
/// wraparound on most writes.
fn bench_ring_stream(c: &mut Criterion) {
    let mut ring = RingBuffer::new(1024).unwrap();
    let chunk = [7u8; 100];
    let mut out = [0u8; 100];
    c.bench_function("ring_stream_4k", |b| {
        b.iter(|| {
            for _ in 0..41 {
                ring.write(black_box(&chunk)).unwrap();
                ring.read(&mut out).unwrap();
            }
            black_box(out[99]);
        });
    });
}

criterion_group!(benches, bench_bump_alloc, bench_ring_stream);
criterion_main!(benches);
