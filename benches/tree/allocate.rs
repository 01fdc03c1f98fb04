use bitmap_tree::{BitmapTree, Word};
use criterion::{criterion_group, measurement::WallTime, BenchmarkGroup, Criterion, Throughput};

const NUM_ALLOCATIONS: u64 = 1 << 16;

fn bench_word<W: Word>(group: &mut BenchmarkGroup<'_, WallTime>, name: &str) {
    group.bench_function(name, |b| {
        b.iter(|| {
            let mut tree = BitmapTree::<W>::with_word();
            for _ in 0..NUM_ALLOCATIONS {
                tree.allocate().unwrap();
            }
            tree
        })
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate/sequential");
    group.throughput(Throughput::Elements(NUM_ALLOCATIONS));
    bench_word::<u8>(&mut group, "u8");
    bench_word::<u16>(&mut group, "u16");
    bench_word::<u32>(&mut group, "u32");
    bench_word::<u64>(&mut group, "u64");
    bench_word::<u128>(&mut group, "u128");
    group.finish();
}

criterion_group!(bench_allocate_group, criterion_benchmark);
