use crate::{
    allocator::Allocator,
    nodes::visitor::{Visitable, Visitor},
    BitmapTree, InnerNode, LeafNode, Word,
};
use core::{error::Error, fmt};

/// An issue with the well-formed-ness of the tree. See the documentation on
/// [`WellFormedChecker`] for more context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedTreeError {
    /// A free summary bit did not match the fullness of its word or child
    SummaryMismatch {
        /// The first index covered by the node
        base: u128,
        /// The depth of the node, the root has depth 0
        depth: u32,
        /// The summary bit which was wrong
        bucket: usize,
    },
    /// A materialized bit did not match the presence of its child
    MaterializedMismatch {
        /// The first index covered by the inner node
        base: u128,
        /// The depth of the inner node
        depth: u32,
        /// The materialized bit which was wrong
        bucket: usize,
    },
    /// A leaf was found above the bottom level, or an inner node at it
    MisplacedNode {
        /// The first index covered by the node
        base: u128,
        /// The depth of the node
        depth: u32,
        /// True if the misplaced node is a leaf
        is_leaf: bool,
    },
    /// The capacity of the tree is not `F ^ (levels + 2)`
    CapacityMismatch {
        /// The number of levels of the tree
        levels: u32,
        /// The capacity recorded by the tree
        capacity: u128,
    },
    /// The number of allocated slots in the leaves differs from the length
    /// recorded by the tree
    WrongAllocatedCount {
        /// The length recorded by the tree
        expected: u64,
        /// The number of allocated slots found in the leaves
        found: u64,
    },
}

impl fmt::Display for MalformedTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedTreeError::SummaryMismatch {
                base,
                depth,
                bucket,
            } => write!(
                f,
                "Free summary bit [{bucket}] of the node at depth [{depth}] starting at index \
                 [{base}] does not match the fullness of what it summarizes"
            ),
            MalformedTreeError::MaterializedMismatch {
                base,
                depth,
                bucket,
            } => write!(
                f,
                "Materialized bit [{bucket}] of the inner node at depth [{depth}] starting at \
                 index [{base}] does not match the presence of the child"
            ),
            MalformedTreeError::MisplacedNode {
                base,
                depth,
                is_leaf,
            } => {
                let kind = if *is_leaf { "leaf" } else { "inner node" };
                write!(
                    f,
                    "Found a {kind} at depth [{depth}] starting at index [{base}], which is on \
                     the wrong level of the tree"
                )
            },
            MalformedTreeError::CapacityMismatch { levels, capacity } => write!(
                f,
                "A tree with [{levels}] levels recorded a capacity of [{capacity}] slots"
            ),
            MalformedTreeError::WrongAllocatedCount { expected, found } => write!(
                f,
                "The tree recorded [{expected}] allocated slots, but the leaves hold [{found}]"
            ),
        }
    }
}

impl Error for MalformedTreeError {}

/// A visitor of the bitmap tree which checks that the tree is well formed.
///
/// A well formed tree has:
///  - a free summary bit set exactly for the words (in a leaf) or children
///    (in an inner node) with at least one free slot, where unmaterialized
///    children count as free
///  - a materialized bit set exactly for the children that are present
///  - every leaf at depth `levels`, and every inner node above it
///  - a capacity of `F ^ (levels + 2)`
///  - a length equal to the number of allocated slots in the leaves
#[derive(Debug)]
pub struct WellFormedChecker {
    levels: u32,
    depth: u32,
    base: u128,
    span: u128,
}

impl WellFormedChecker {
    /// Check that the given tree is well formed, returning the number of
    /// allocated slots found.
    ///
    /// # Errors
    ///
    /// Returns the first [`MalformedTreeError`] found during a depth first
    /// traversal.
    pub fn check<W: Word, A: Allocator>(
        tree: &BitmapTree<W, A>,
    ) -> Result<u64, MalformedTreeError> {
        let expected_capacity = (0..tree.levels())
            .try_fold(crate::nodes::leaf_span::<W>(), |span, _| {
                span.checked_mul(W::BITS as u128)
            });
        if expected_capacity != Some(tree.capacity()) {
            return Err(MalformedTreeError::CapacityMismatch {
                levels: tree.levels(),
                capacity: tree.capacity(),
            });
        }

        let mut checker = WellFormedChecker {
            levels: tree.levels(),
            depth: 0,
            base: 0,
            span: tree.capacity(),
        };

        let found = tree.visit_with(&mut checker)?;
        if found != tree.len() {
            return Err(MalformedTreeError::WrongAllocatedCount {
                expected: tree.len(),
                found,
            });
        }

        Ok(found)
    }
}

impl<W: Word, A: Allocator> Visitor<W, A> for WellFormedChecker {
    type Output = Result<u64, MalformedTreeError>;

    fn default_output(&self) -> Self::Output {
        Ok(0)
    }

    fn combine_output(&self, o1: Self::Output, o2: Self::Output) -> Self::Output {
        Ok(o1? + o2?)
    }

    fn visit_inner(&mut self, t: &InnerNode<W, A>) -> Self::Output {
        if self.depth >= self.levels {
            return Err(MalformedTreeError::MisplacedNode {
                base: self.base,
                depth: self.depth,
                is_leaf: false,
            });
        }

        for bucket in 0..W::BITS {
            let child = t.child(bucket);
            if t.materialized().test_bit(bucket) != child.is_some() {
                return Err(MalformedTreeError::MaterializedMismatch {
                    base: self.base,
                    depth: self.depth,
                    bucket,
                });
            }

            let has_free = child.map_or(true, |child| !child.is_full());
            if t.free_summary().test_bit(bucket) != has_free {
                return Err(MalformedTreeError::SummaryMismatch {
                    base: self.base,
                    depth: self.depth,
                    bucket,
                });
            }
        }

        let (depth, base, span) = (self.depth, self.base, self.span);
        let child_span = span / W::BITS as u128;
        let mut allocated = 0;
        for (bucket, child) in t.iter() {
            self.depth = depth + 1;
            self.base = base + bucket as u128 * child_span;
            self.span = child_span;

            let result = child.visit_with(self);

            self.depth = depth;
            self.base = base;
            self.span = span;
            allocated += result?;
        }

        Ok(allocated)
    }

    fn visit_leaf(&mut self, t: &LeafNode<W>) -> Self::Output {
        if self.depth != self.levels {
            return Err(MalformedTreeError::MisplacedNode {
                base: self.base,
                depth: self.depth,
                is_leaf: true,
            });
        }

        for (bucket, bits) in t.words().iter().enumerate() {
            if t.free_summary().test_bit(bucket) != (*bits != W::ZERO) {
                return Err(MalformedTreeError::SummaryMismatch {
                    base: self.base,
                    depth: self.depth,
                    bucket,
                });
            }
        }

        Ok(t.allocated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;

    #[test]
    fn fresh_tree_is_well_formed() {
        let tree = BitmapTree::<u16>::with_word();
        assert_eq!(WellFormedChecker::check(&tree), Ok(0));
    }

    #[test]
    fn sparse_tree_is_well_formed() {
        let mut tree = BitmapTree::<u8>::with_word();
        for idx in [0, 63, 64, 511, 100_000, 77] {
            tree.allocate_at(idx);
        }
        tree.deallocate(63);
        assert_eq!(WellFormedChecker::check(&tree), Ok(5));
    }

    #[test]
    fn full_subtrees_are_well_formed() {
        let mut tree = BitmapTree::<u8>::with_word();
        for _ in 0..1000 {
            tree.allocate().unwrap();
        }
        assert_eq!(WellFormedChecker::check(&tree), Ok(1000));

        tree.deallocate(0);
        tree.deallocate(512);
        assert_eq!(WellFormedChecker::check(&tree), Ok(998));
    }

    #[test]
    fn detects_summary_mismatch() {
        let mut leaf = LeafNode::<u8>::new();
        leaf.words[3] = 0;

        let mut checker = WellFormedChecker {
            levels: 0,
            depth: 0,
            base: 0,
            span: 64,
        };
        assert_eq!(
            <LeafNode<u8> as Visitable<u8, crate::allocator::Global>>::visit_with(
                &leaf,
                &mut checker
            ),
            Err(MalformedTreeError::SummaryMismatch {
                base: 0,
                depth: 0,
                bucket: 3
            })
        );
    }

    #[test]
    fn detects_materialized_mismatch_and_misplaced_nodes() {
        let mut inner = InnerNode::<u8>::new();
        inner.materialized.set_bit(2);

        let mut checker = WellFormedChecker {
            levels: 1,
            depth: 0,
            base: 0,
            span: 512,
        };
        assert_eq!(
            inner.visit_with(&mut checker),
            Err(MalformedTreeError::MaterializedMismatch {
                base: 0,
                depth: 0,
                bucket: 2
            })
        );

        // a leaf child directly under a root that expects two levels
        let mut inner = InnerNode::<u8>::new();
        inner.materialize(1, 64, &crate::allocator::Global).unwrap();
        let node = Node::Inner(inner);
        let mut checker = WellFormedChecker {
            levels: 2,
            depth: 0,
            base: 0,
            span: 4096,
        };
        assert_eq!(
            node.visit_with(&mut checker),
            Err(MalformedTreeError::MisplacedNode {
                base: 512,
                depth: 1,
                is_leaf: true
            })
        );
    }
}
