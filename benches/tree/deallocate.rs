use crate::common::{dense_tree, random_indices};
use criterion::{criterion_group, BatchSize, Criterion, Throughput};

const NUM_INDICES: u64 = 1 << 18;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("deallocate");
    let tree = dense_tree::<u64>(NUM_INDICES);
    let freed = random_indices(4_096, NUM_INDICES);

    group.throughput(Throughput::Elements(freed.len() as u64));
    group.bench_function("random", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                for idx in &freed {
                    tree.deallocate(*idx);
                }
                tree
            },
            BatchSize::LargeInput,
        )
    });

    // free random indices, then let first-fit hand them back out
    group.bench_function("churn", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                for idx in &freed {
                    tree.deallocate(*idx);
                    tree.allocate().unwrap();
                }
                tree
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(bench_deallocate_group, criterion_benchmark);
