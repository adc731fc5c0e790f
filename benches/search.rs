//! Benchmarks for the sequence-point searches.
//!
//! Measures the two-phase boundary searches and the range mapping built on them, over
//! streams the size of a large generated method.

extern crate peeker;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use peeker::{
    mapping::{covering_range, first_by_offset, first_by_source, last_by_offset, map_by_offset},
    metadata::sequencepoints::SequencePoint,
};
use std::hint::black_box;

/// One statement per line, `step` IL bytes each.
fn stream(count: u32, step: u32, first_line: u32) -> Vec<SequencePoint> {
    (0..count)
        .map(|index| {
            let line = first_line + index;
            SequencePoint::new(index * step, (index + 1) * step, line, 8, line, 40)
        })
        .collect()
}

fn bench_first_by_offset(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_by_offset");
    for count in [16u32, 256, 4096] {
        let points = stream(count, 6, 1);
        let target = count * 3 + 1;
        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| first_by_offset(black_box(points), black_box(target)));
        });
    }
    group.finish();
}

fn bench_last_by_offset(c: &mut Criterion) {
    let points = stream(4096, 6, 1);

    c.bench_function("last_by_offset_past_end", |b| {
        b.iter(|| last_by_offset(black_box(&points), black_box(u32::MAX)));
    });
}

fn bench_first_by_source(c: &mut Criterion) {
    let points = stream(4096, 6, 1);

    c.bench_function("first_by_source", |b| {
        b.iter(|| first_by_source(black_box(&points), black_box(2048), black_box(20)));
    });
}

fn bench_map_by_offset(c: &mut Criterion) {
    let reconstructed = stream(4096, 6, 1);
    let original = stream(4096, 6, 100);

    c.bench_function("covering_then_map", |b| {
        b.iter(|| {
            let covering = covering_range(black_box(&reconstructed), 1000, 8, 1010, 40);
            black_box(map_by_offset(covering, black_box(&original)))
        });
    });
}

criterion_group!(
    benches,
    bench_first_by_offset,
    bench_last_by_offset,
    bench_first_by_source,
    bench_map_by_offset
);
criterion_main!(benches);
