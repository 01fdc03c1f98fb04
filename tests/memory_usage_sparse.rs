use bitmap_tree::{visitor::TreeStatsCollector, BitmapTree};

mod common;

#[test]
#[cfg(not(miri))]
fn test_memory_usage_of_sparse_tree() {
    const STRIDE: u64 = 1_000_003;

    let prof = common::get_profiler(file!());

    common::test_heap(&prof, |stats| {
        dhat::assert_eq!(stats.curr_blocks, 0);
        dhat::assert_eq!(stats.curr_bytes, 0);
    });

    {
        let mut tree = BitmapTree::<u8>::with_word();
        for idx in (0..1_000).map(|n| n * STRIDE) {
            tree.allocate_at(idx);
        }
        tree.allocate_at(u64::MAX);

        let tree_stats = TreeStatsCollector::collect(&tree);
        dhat::assert_eq!(tree_stats.levels, 20);
        dhat::assert_eq!(tree_stats.allocated_slots, 1_001);
        // every index lands in its own leaf
        dhat::assert_eq!(tree_stats.leaf_nodes, 1_001);

        common::test_heap(&prof, |stats| {
            dhat::assert_eq!(stats.curr_blocks as u64, tree_stats.node_count());
            dhat::assert_eq!(stats.curr_bytes, tree_stats.mem_usage);
        });

        let copy = tree.clone();
        common::test_heap(&prof, |stats| {
            dhat::assert_eq!(stats.curr_blocks as u64, 2 * tree_stats.node_count());
        });
        drop(copy);
    }

    common::test_heap(&prof, |stats| {
        dhat::assert_eq!(stats.curr_blocks, 0);
        dhat::assert_eq!(stats.curr_bytes, 0);
    });
}
