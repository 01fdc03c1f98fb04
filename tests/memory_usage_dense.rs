use bitmap_tree::{visitor::TreeStatsCollector, BitmapTree, Node};
use std::mem;

mod common;

#[test]
#[cfg(not(miri))]
fn test_memory_usage_of_dense_tree() {
    const NUM_INDICES: u64 = 100_000;

    let prof = common::get_profiler(file!());

    common::test_heap(&prof, |stats| {
        dhat::assert_eq!(stats.curr_blocks, 0);
        dhat::assert_eq!(stats.curr_bytes, 0);
    });

    {
        let mut tree = BitmapTree::new();
        // allocations made inside a dhat assert are not tracked
        for expected in 0..NUM_INDICES {
            let idx = tree.allocate().unwrap();
            dhat::assert_eq!(idx, expected);
        }

        let tree_stats = TreeStatsCollector::collect(&tree);
        // 4096 slots per leaf under a single inner root
        dhat::assert_eq!(tree_stats.levels, 1);
        dhat::assert_eq!(tree_stats.inner_nodes, 1);
        dhat::assert_eq!(tree_stats.leaf_nodes, NUM_INDICES.div_ceil(4096));

        common::test_heap(&prof, |stats| {
            dhat::assert_eq!(stats.curr_blocks as u64, tree_stats.node_count());
            dhat::assert_eq!(stats.curr_bytes, tree_stats.mem_usage);
            dhat::assert_eq!(
                stats.curr_bytes,
                tree_stats.node_count() as usize * mem::size_of::<Node<u64>>()
            );
        });

        // freeing never releases nodes
        for idx in 0..NUM_INDICES {
            tree.deallocate(idx);
        }
        common::test_heap(&prof, |stats| {
            dhat::assert_eq!(stats.curr_blocks as u64, tree_stats.node_count());
        });
    }

    common::test_heap(&prof, |stats| {
        dhat::assert_eq!(stats.curr_blocks, 0);
        dhat::assert_eq!(stats.curr_bytes, 0);
    });
}
