use crate::common::{dense_tree, sparse_tree};
use criterion::{criterion_group, Criterion};

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone");

    let dense = dense_tree::<u64>(1 << 20);
    let sparse = sparse_tree::<u64>(1_000);

    group.bench_function("dense", |b| b.iter(|| dense.clone()));
    group.bench_function("sparse", |b| b.iter(|| sparse.clone()));
    group.finish();
}

criterion_group!(bench_clone_group, criterion_benchmark);
