//! Benchmark for ConcurrentBucketSet under thread contention.

use bucket_set::ConcurrentBucketSet;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::thread;

const INSERTS_PER_THREAD: u32 = 2_500;

// =============================================================================
// parallel insert Benchmark
// =============================================================================

fn benchmark_parallel_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("concurrent_insert");

    for thread_count in [1_u32, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("threads", thread_count),
            &thread_count,
            |bencher, &thread_count| {
                bencher.iter(|| {
                    let set = ConcurrentBucketSet::<u32>::new(1_024).unwrap();
                    thread::scope(|scope| {
                        for worker in 0..thread_count {
                            let set = &set;
                            scope.spawn(move || {
                                let offset = worker * INSERTS_PER_THREAD;
                                for value in offset..offset + INSERTS_PER_THREAD {
                                    set.insert(black_box(value));
                                }
                            });
                        }
                    });
                    black_box(set.len())
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// mixed read/write Benchmark
// =============================================================================

fn benchmark_read_heavy(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("concurrent_read_heavy");

    for bucket_count in [16_usize, 1_024] {
        let set = ConcurrentBucketSet::<u32>::new(bucket_count).unwrap();
        for value in 0..10_000 {
            set.insert(value);
        }

        group.bench_with_input(
            BenchmarkId::new("ConcurrentBucketSet", bucket_count),
            &bucket_count,
            |bencher, _| {
                bencher.iter(|| {
                    thread::scope(|scope| {
                        scope.spawn(|| {
                            for value in 10_000..10_100 {
                                set.insert(black_box(value));
                            }
                        });
                        for _ in 0..3 {
                            scope.spawn(|| {
                                let hits = (0..10_000)
                                    .filter(|value| set.contains(&black_box(*value)))
                                    .count();
                                black_box(hits)
                            });
                        }
                    });
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_parallel_insert, benchmark_read_heavy);

criterion_main!(benches);
