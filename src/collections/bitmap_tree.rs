//! Module containing the implementation of [`BitmapTree`].

use crate::{
    allocator::{Allocator, Box, Global},
    nodes::{
        claim_at, claim_first, clone_node, deallocate_descendants, is_allocated, leaf_span,
        release, wrap_root,
    },
    LeafNode, Node, Word,
};
use alloc::alloc::handle_alloc_error;
use core::fmt;

mod error;
pub use error::*;


/// The default exclusive limit on indices, covering every `u64`.
pub const DEFAULT_LIMIT: u128 = 1 << 64;

/// A growable allocator of unique `u64` indices.
///
/// Indices are tracked in a tree of bitmaps whose branching factor is the bit
/// width of `W`. The tree starts as a single leaf covering `F * F` indices
/// and gains a new root level whenever an index beyond its capacity is
/// requested. Subtrees are only materialized once an index inside them is
/// allocated, so sparse index sets stay cheap.
///
/// [`allocate`](BitmapTree::allocate) always hands out the lowest free index.
pub struct BitmapTree<W: Word = u64, A: Allocator = Global> {
    /// The root node, covering `capacity` slots.
    root: Box<Node<W, A>, A>,
    /// Number of inner levels above the leaves.
    levels: u32,
    /// Number of slots covered by the root, `F ^ (levels + 2)`.
    capacity: u128,
    /// Number of allocated slots.
    num_allocated: u64,
    /// Exclusive upper bound on indices handed out or accepted.
    limit: u128,
    /// The allocator which will be used to alloc and dealloc tree nodes.
    alloc: A,
}

impl BitmapTree {
    /// Create a new, empty [`BitmapTree`] with a branching factor of 64 and
    /// room for every `u64` index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bitmap_tree::BitmapTree;
    ///
    /// let mut tree = BitmapTree::new();
    /// assert_eq!(tree.allocate(), Ok(0));
    /// assert_eq!(tree.allocate(), Ok(1));
    /// assert!(tree.is_allocated(1));
    /// ```
    pub fn new() -> Self {
        Self::with_word()
    }
}

impl<A: Allocator + Clone> BitmapTree<u64, A> {
    /// Create a new, empty [`BitmapTree`] with a branching factor of 64, which
    /// will allocate tree nodes using the given allocator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bitmap_tree::BitmapTree;
    /// use allocator_api2::alloc::Global;
    ///
    /// let mut tree = BitmapTree::new_in(Global);
    /// tree.allocate_at(10);
    /// assert!(tree.is_allocated(10));
    /// ```
    pub fn new_in(alloc: A) -> Self {
        Self::with_word_in(alloc)
    }
}

impl<W: Word> BitmapTree<W> {
    /// Create a new, empty [`BitmapTree`] whose branching factor is the bit
    /// width of `W`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bitmap_tree::BitmapTree;
    ///
    /// let tree = BitmapTree::<u8>::with_word();
    /// assert_eq!(tree.capacity(), 64);
    /// ```
    pub fn with_word() -> Self {
        Self::with_word_in(Global)
    }

    /// Create a new, empty [`BitmapTree`] which only hands out indices below
    /// `limit`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bitmap_tree::{BitmapTree, TreeError};
    ///
    /// let mut tree = BitmapTree::<u8>::with_limit(2);
    /// assert_eq!(tree.allocate(), Ok(0));
    /// assert_eq!(tree.allocate(), Ok(1));
    /// assert_eq!(tree.allocate(), Err(TreeError::CapacityExhausted { limit: 2 }));
    /// ```
    pub fn with_limit(limit: u64) -> Self {
        Self::with_limit_in(limit, Global)
    }
}

impl<W: Word, A: Allocator + Clone> BitmapTree<W, A> {
    /// Create a new, empty [`BitmapTree`] whose branching factor is the bit
    /// width of `W`, which will allocate tree nodes using the given
    /// allocator.
    pub fn with_word_in(alloc: A) -> Self {
        Self::with_raw_limit_in(DEFAULT_LIMIT, alloc)
    }

    /// Create a new, empty [`BitmapTree`] which only hands out indices below
    /// `limit`, and will allocate tree nodes using the given allocator.
    pub fn with_limit_in(limit: u64, alloc: A) -> Self {
        Self::with_raw_limit_in(u128::from(limit), alloc)
    }

    fn with_raw_limit_in(limit: u128, alloc: A) -> Self {
        BitmapTree {
            root: Box::new_in(Node::Leaf(LeafNode::new()), alloc.clone()),
            levels: 0,
            capacity: leaf_span::<W>(),
            num_allocated: 0,
            limit,
            alloc,
        }
    }

    /// Mark `index` as allocated, growing the tree if needed.
    ///
    /// Allocating an index which is already allocated does nothing.
    ///
    /// # Panics
    ///
    ///  - Panics if `index` is not below the [limit](BitmapTree::limit) of
    ///    the tree.
    ///  - Aborts through [`handle_alloc_error`] if a node cannot be
    ///    allocated. See [`BitmapTree::try_allocate_at`] for a fallible
    ///    version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bitmap_tree::BitmapTree;
    ///
    /// let mut tree = BitmapTree::<u8>::with_word();
    /// tree.allocate_at(100);
    /// tree.allocate_at(100);
    /// assert!(tree.is_allocated(100));
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(tree.capacity(), 512);
    ///
    /// tree.allocate_at(600);
    /// assert_eq!(tree.levels(), 2);
    /// assert_eq!(tree.capacity(), 4096);
    /// ```
    pub fn allocate_at(&mut self, index: u64) {
        match self.try_allocate_at(index) {
            Ok(()) => {},
            Err(TreeError::AllocationFailure { layout }) => handle_alloc_error(layout),
            Err(err) => panic!("{err}"),
        }
    }

    /// Mark `index` as allocated, growing the tree if needed.
    ///
    /// Allocating an index which is already allocated does nothing.
    ///
    /// # Errors
    ///
    ///  - Returns [`TreeError::IndexOutOfRange`] if `index` is not below the
    ///    limit of the tree.
    ///  - Returns [`TreeError::AllocationFailure`] if a node cannot be
    ///    allocated. The index is not allocated in that case, but levels or
    ///    nodes created before the failure are kept.
    pub fn try_allocate_at(&mut self, index: u64) -> Result<(), TreeError> {
        let target = u128::from(index);
        if target >= self.limit {
            return Err(TreeError::IndexOutOfRange {
                index,
                limit: self.limit,
            });
        }

        while target >= self.capacity {
            self.grow()?;
        }

        let update = claim_at(&mut *self.root, self.capacity, target, &self.alloc)?;
        if update.changed {
            self.num_allocated += 1;
        }

        Ok(())
    }

    /// Return true if `index` is allocated.
    ///
    /// This never modifies the tree. Indices beyond the current capacity are
    /// reported as free.
    pub fn is_allocated(&self, index: u64) -> bool {
        is_allocated(&*self.root, self.capacity, u128::from(index))
    }

    /// Allocate the lowest free index and return it, growing the tree if it
    /// is full.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::CapacityExhausted`] if every index below the
    /// limit is allocated.
    ///
    /// # Panics
    ///
    /// Aborts through [`handle_alloc_error`] if a node cannot be allocated.
    /// See [`BitmapTree::try_allocate`] for a fallible version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bitmap_tree::BitmapTree;
    ///
    /// let mut tree = BitmapTree::new();
    /// tree.allocate_at(0);
    /// tree.allocate_at(2);
    /// assert_eq!(tree.allocate(), Ok(1));
    /// assert_eq!(tree.allocate(), Ok(3));
    /// ```
    pub fn allocate(&mut self) -> Result<u64, TreeError> {
        match self.try_allocate() {
            Err(TreeError::AllocationFailure { layout }) => handle_alloc_error(layout),
            result => result,
        }
    }

    /// Allocate the lowest free index and return it, growing the tree if it
    /// is full.
    ///
    /// # Errors
    ///
    ///  - Returns [`TreeError::CapacityExhausted`] if every index below the
    ///    limit is allocated.
    ///  - Returns [`TreeError::AllocationFailure`] if a node cannot be
    ///    allocated, in which case no index is allocated.
    pub fn try_allocate(&mut self) -> Result<u64, TreeError> {
        if self.root.is_full() {
            if self.capacity >= self.limit {
                log::debug!("bitmap tree exhausted below limit {}", self.limit);
                return Err(TreeError::CapacityExhausted { limit: self.limit });
            }

            self.grow()?;
            debug_assert!(
                !self.root.is_full(),
                "a new root level must have a free child"
            );
        }

        let (index, _) = claim_first(&mut *self.root, self.capacity, 0, self.limit, &self.alloc)
            .inspect_err(|err| {
                if let TreeError::CapacityExhausted { limit } = err {
                    log::debug!("bitmap tree exhausted below limit {limit}");
                }
            })?;
        self.num_allocated += 1;

        // `index` is below `limit`, which never exceeds `u64::MAX + 1`
        Ok(index as u64)
    }

    /// Mark `index` as free.
    ///
    /// Freeing an index which is already free does nothing. The tree never
    /// shrinks, so capacity and materialized nodes are kept.
    pub fn deallocate(&mut self, index: u64) {
        let target = u128::from(index);
        if target >= self.capacity {
            return;
        }

        if release(&mut *self.root, self.capacity, target).changed {
            self.num_allocated -= 1;
        }
    }

    /// Add one root level, multiplying the capacity by `F`.
    fn grow(&mut self) -> Result<(), TreeError> {
        wrap_root(&mut self.root, &self.alloc)?;
        self.capacity *= W::BITS as u128;
        self.levels += 1;

        log::debug!(
            "bitmap tree grew to {} levels covering {} slots",
            self.levels,
            self.capacity
        );

        Ok(())
    }
}

impl<W: Word, A: Allocator> BitmapTree<W, A> {
    /// Returns the number of allocated indices.
    pub fn len(&self) -> u64 {
        self.num_allocated
    }

    /// Returns true if no index is allocated.
    pub fn is_empty(&self) -> bool {
        self.num_allocated == 0
    }

    /// Returns the number of indices the tree covers without growing,
    /// `F ^ (levels + 2)`.
    ///
    /// This is never reduced during the lifetime of the tree.
    pub fn capacity(&self) -> u128 {
        self.capacity
    }

    /// Returns the number of inner levels above the leaves. A tree whose
    /// root is a leaf has zero levels.
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Returns the exclusive upper bound on indices in this tree.
    pub fn limit(&self) -> u128 {
        self.limit
    }

    /// Returns a reference to the underlying allocator.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    pub(crate) fn root(&self) -> &Node<W, A> {
        &self.root
    }
}

impl<W: Word, A: Allocator> Drop for BitmapTree<W, A> {
    fn drop(&mut self) {
        deallocate_descendants(&mut *self.root);
    }
}

impl<W: Word, A: Allocator + Clone> Clone for BitmapTree<W, A> {
    fn clone(&self) -> Self {
        BitmapTree {
            root: Box::new_in(clone_node(&*self.root, &self.alloc), self.alloc.clone()),
            levels: self.levels,
            capacity: self.capacity,
            num_allocated: self.num_allocated,
            limit: self.limit,
            alloc: self.alloc.clone(),
        }
    }
}

impl<W: Word, A: Allocator> fmt::Debug for BitmapTree<W, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitmapTree")
            .field("len", &self.num_allocated)
            .field("levels", &self.levels)
            .field("capacity", &self.capacity)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl<W: Word> Default for BitmapTree<W> {
    fn default() -> Self {
        Self::with_word()
    }
}
