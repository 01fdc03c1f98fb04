use criterion::criterion_main;

mod common;
mod tree;

criterion_main!(
    tree::allocate::bench_allocate_group,
    tree::allocate_at::bench_allocate_at_group,
    tree::clone::bench_clone_group,
    tree::deallocate::bench_deallocate_group,
);
