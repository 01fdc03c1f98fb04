use bitmap_tree::{BitmapTree, Word};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const SEED: u64 = 0x5EED_0F_B175;

/// `count` random indices below `bound`, the same for every run.
pub fn random_indices(count: usize, bound: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..count).map(|_| rng.random_range(0..bound)).collect()
}

/// A tree with the first `count` indices allocated.
pub fn dense_tree<W: Word>(count: u64) -> BitmapTree<W> {
    let mut tree = BitmapTree::with_word();
    for _ in 0..count {
        tree.allocate().unwrap();
    }
    tree
}

/// A tree with `count` random indices spread over the whole `u64` range.
pub fn sparse_tree<W: Word>(count: usize) -> BitmapTree<W> {
    let mut tree = BitmapTree::with_word();
    for idx in random_indices(count, u64::MAX) {
        tree.allocate_at(idx);
    }
    tree
}
