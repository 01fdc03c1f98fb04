use crate::common::random_indices;
use bitmap_tree::BitmapTree;
use criterion::{criterion_group, BatchSize, Criterion, Throughput};

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_at");

    for (name, bound) in [("clustered", 1 << 20), ("spread", u64::MAX)] {
        let indices = random_indices(10_000, bound);
        group.throughput(Throughput::Elements(indices.len() as u64));
        group.bench_function(name, |b| {
            b.iter_batched(
                BitmapTree::new,
                |mut tree| {
                    for idx in &indices {
                        tree.allocate_at(*idx);
                    }
                    tree
                },
                BatchSize::SmallInput,
            )
        });
    }

    let indices = random_indices(10_000, 1 << 20);
    let mut tree = BitmapTree::new();
    for idx in indices.iter().step_by(2) {
        tree.allocate_at(*idx);
    }
    group.throughput(Throughput::Elements(indices.len() as u64));
    group.bench_function("is_allocated", |b| {
        b.iter(|| indices.iter().filter(|idx| tree.is_allocated(**idx)).count())
    });

    group.finish();
}

criterion_group!(bench_allocate_at_group, criterion_benchmark);
