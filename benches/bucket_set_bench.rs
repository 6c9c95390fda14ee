//! Benchmark for BucketSet vs standard HashSet.
//!
//! A fixed bucket count never grows, so chains lengthen as the element
//! count rises. The bucket counts below show how chain length drives the
//! cost of `insert` and `contains`.

use bucket_set::BucketSet;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::HashSet;
use std::hint::black_box;

const ELEMENT_COUNT: i32 = 10_000;

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for bucket_count in [64_usize, 1_024, 16_384] {
        group.bench_with_input(
            BenchmarkId::new("BucketSet", bucket_count),
            &bucket_count,
            |bencher, &bucket_count| {
                bencher.iter(|| {
                    let mut set = BucketSet::new(bucket_count).unwrap();
                    for value in 0..ELEMENT_COUNT {
                        set.insert(black_box(value));
                    }
                    black_box(set)
                });
            },
        );
    }

    group.bench_function("HashSet", |bencher| {
        bencher.iter(|| {
            let mut set = HashSet::new();
            for value in 0..ELEMENT_COUNT {
                set.insert(black_box(value));
            }
            black_box(set)
        });
    });

    group.finish();
}

// =============================================================================
// contains Benchmark
// =============================================================================

fn benchmark_contains(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("contains");

    for bucket_count in [64_usize, 1_024, 16_384] {
        let mut set = BucketSet::new(bucket_count).unwrap();
        set.extend(0..ELEMENT_COUNT);

        group.bench_with_input(
            BenchmarkId::new("BucketSet", bucket_count),
            &bucket_count,
            |bencher, _| {
                bencher.iter(|| {
                    // Half the probes miss
                    let hits = (0..ELEMENT_COUNT * 2)
                        .filter(|value| set.contains(&black_box(*value)))
                        .count();
                    black_box(hits)
                });
            },
        );
    }

    let standard_set: HashSet<i32> = (0..ELEMENT_COUNT).collect();
    group.bench_function("HashSet", |bencher| {
        bencher.iter(|| {
            let hits = (0..ELEMENT_COUNT * 2)
                .filter(|value| standard_set.contains(&black_box(*value)))
                .count();
            black_box(hits)
        });
    });

    group.finish();
}

// =============================================================================
// iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for bucket_count in [64_usize, 16_384] {
        let mut set = BucketSet::new(bucket_count).unwrap();
        set.extend(0..ELEMENT_COUNT);

        group.bench_with_input(
            BenchmarkId::new("BucketSet", bucket_count),
            &bucket_count,
            |bencher, _| {
                bencher.iter(|| black_box(set.iter().map(|value| i64::from(*value)).sum::<i64>()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_contains,
    benchmark_iteration
);

criterion_main!(benches);
