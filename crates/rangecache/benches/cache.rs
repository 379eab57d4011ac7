use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rangecache::{CachedArray, IntervalCache};
use rangestore::{ArrayStore, Interval};

const LEN: usize = 20_000;

fn values() -> Vec<i64> {
    (0..LEN as i64).map(|i| i % 100 + 1).collect()
}

fn bench_hot_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("hot_range");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("uncached", |b| {
        let store = ArrayStore::new(values());
        b.iter(|| {
            black_box(store.range_sum(100, LEN - 100).unwrap());
        });
    });

    group.bench_function("cached", |b| {
        let cached = CachedArray::new(values(), 1000);
        cached.range_sum(100, LEN - 100).unwrap();
        b.iter(|| {
            black_box(cached.range_sum(100, LEN - 100).unwrap());
        });
    });

    group.finish();
}

fn bench_invalidate(c: &mut Criterion) {
    let mut group = c.benchmark_group("invalidate");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("scan_1000_entries", |b| {
        let mut cache = IntervalCache::new(1000);
        for i in 0..1000 {
            cache.insert(Interval::new(i * 10, i * 10 + 5).unwrap(), i as i64);
        }

        // Index that no entry covers, so the cache stays full.
        b.iter(|| {
            black_box(cache.invalidate(7));
        });
    });

    group.finish();
}

fn bench_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("97_range_3_update_cached", |b| {
        let cached = CachedArray::new(values(), 1000);
        let hot: Vec<(usize, usize)> = (0..30).map(|i| (i * 100, LEN / 2 + i * 100)).collect();

        let mut counter = 0usize;
        b.iter(|| {
            if counter % 100 < 3 {
                black_box(cached.update((counter * 7) % LEN, 1).ok());
            } else {
                let (left, right) = hot[counter % hot.len()];
                black_box(cached.range_sum(left, right).ok());
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_hot_range, bench_invalidate, bench_mixed);
criterion_main!(benches);
