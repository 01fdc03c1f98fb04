use crate::{
    allocator::Allocator,
    visitor::{Visitable, Visitor},
    BitmapTree, InnerNode, LeafNode, Node, Word,
};
use core::{fmt, mem};

/// A visitor of the bitmap tree which collects statistics about the tree, like
/// how many inner nodes and leaves are materialized.
#[derive(Debug)]
pub struct TreeStatsCollector {
    stats: TreeStats,
}

impl TreeStatsCollector {
    /// Run the tree stats collection on the given tree, then return the
    /// accumulated stats.
    pub fn collect<W: Word, A: Allocator>(tree: &BitmapTree<W, A>) -> TreeStats {
        let mut collector = TreeStatsCollector {
            stats: TreeStats {
                branching_factor: W::BITS,
                levels: tree.levels(),
                capacity: tree.capacity(),
                inner_nodes: 0,
                leaf_nodes: 0,
                allocated_slots: 0,
                full_words: 0,
                mem_usage: 0,
            },
        };

        tree.visit_with(&mut collector);
        collector.stats.mem_usage =
            collector.stats.node_count() as usize * mem::size_of::<Node<W, A>>();

        collector.stats
    }
}

/// Collection of stats about the materialized nodes of a tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStats {
    /// The branching factor `F` of the tree
    pub branching_factor: usize,
    /// The number of inner levels above the leaves
    pub levels: u32,
    /// The number of slots covered by the root
    pub capacity: u128,
    /// The number of materialized inner nodes, including an inner root
    pub inner_nodes: u64,
    /// The number of materialized leaves
    pub leaf_nodes: u64,
    /// The number of allocated slots
    pub allocated_slots: u64,
    /// The number of leaf words with every slot allocated
    pub full_words: u64,
    /// Heap bytes used by the materialized nodes
    pub mem_usage: usize,
}

impl TreeStats {
    /// Total number of materialized nodes.
    pub fn node_count(&self) -> u64 {
        self.inner_nodes + self.leaf_nodes
    }

    /// Number of slots held by materialized leaves.
    pub fn materialized_slots(&self) -> u64 {
        let leaf_slots = (self.branching_factor * self.branching_factor) as u64;
        self.leaf_nodes * leaf_slots
    }

    /// The fraction of materialized slots which are allocated, or `0.0` when
    /// no leaf is materialized.
    pub fn occupancy(&self) -> f64 {
        match self.materialized_slots() {
            0 => 0.0,
            slots => self.allocated_slots as f64 / slots as f64,
        }
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeStats")
            .field("branching_factor", &self.branching_factor)
            .field("levels", &self.levels)
            .field("capacity", &self.capacity)
            .field("inner_nodes", &self.inner_nodes)
            .field("leaf_nodes", &self.leaf_nodes)
            .field("allocated_slots", &self.allocated_slots)
            .field("full_words", &self.full_words)
            .field("mem_usage", &self.mem_usage)
            .field("occupancy", &format_args!("{:.4}", self.occupancy()))
            .finish()
    }
}

impl<W: Word, A: Allocator> Visitor<W, A> for TreeStatsCollector {
    type Output = ();

    fn default_output(&self) -> Self::Output {}

    fn combine_output(&self, _: Self::Output, _: Self::Output) -> Self::Output {}

    fn visit_inner(&mut self, t: &InnerNode<W, A>) -> Self::Output {
        self.stats.inner_nodes += 1;
        t.super_visit_with(self)
    }

    fn visit_leaf(&mut self, t: &LeafNode<W>) -> Self::Output {
        self.stats.leaf_nodes += 1;
        self.stats.allocated_slots += t.allocated();
        self.stats.full_words += t.words().iter().filter(|bits| **bits == W::ZERO).count() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_for_single_leaf() {
        let mut tree = BitmapTree::<u8>::with_word();
        for _ in 0..10 {
            tree.allocate().unwrap();
        }

        let stats = TreeStatsCollector::collect(&tree);
        assert_eq!(stats.branching_factor, 8);
        assert_eq!(stats.levels, 0);
        assert_eq!(stats.capacity, 64);
        assert_eq!(stats.inner_nodes, 0);
        assert_eq!(stats.leaf_nodes, 1);
        assert_eq!(stats.allocated_slots, 10);
        assert_eq!(stats.full_words, 1);
        assert_eq!(stats.materialized_slots(), 64);
        assert_eq!(stats.mem_usage, mem::size_of::<Node<u8>>());
        assert_eq!(stats.occupancy(), 10.0 / 64.0);
    }

    #[test]
    fn stats_for_sparse_tree() {
        let mut tree = BitmapTree::<u8>::with_word();
        // leaves under different level 1 subtrees
        tree.allocate_at(1);
        tree.allocate_at(3000);
        tree.allocate_at(3001);

        let stats = TreeStatsCollector::collect(&tree);
        assert_eq!(stats.levels, 2);
        assert_eq!(stats.capacity, 4096);
        assert_eq!(stats.inner_nodes, 3);
        assert_eq!(stats.leaf_nodes, 2);
        assert_eq!(stats.node_count(), 5);
        assert_eq!(stats.allocated_slots, 3);
        assert_eq!(stats.full_words, 0);
        assert_eq!(stats.mem_usage, 5 * mem::size_of::<Node<u8>>());
    }

    #[test]
    fn display_lists_fields() {
        let tree = BitmapTree::<u16>::with_word();
        let stats = TreeStatsCollector::collect(&tree);
        let text = std::format!("{stats}");
        assert!(text.starts_with("TreeStats {"));
        assert!(text.contains("leaf_nodes: 1"));
        assert!(text.contains("occupancy: 0.0000"));
    }
}
