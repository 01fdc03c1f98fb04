//! Node types of the bitmap tree.

use crate::{
    allocator::{Allocator, Box, Global},
    Word,
};
use core::fmt;


/// Owning link from an inner node to one of its children, `None` while the
/// child has not been materialized.
pub type ChildPtr<W, A = Global> = Option<Box<Node<W, A>, A>>;

/// A node of the tree, either a [`LeafNode`] holding slot bits directly or an
/// [`InnerNode`] holding children.
pub enum Node<W: Word, A: Allocator = Global> {
    /// A node at the bottom level of the tree.
    Leaf(LeafNode<W>),
    /// A node above the bottom level of the tree.
    Inner(InnerNode<W, A>),
}

impl<W: Word, A: Allocator> Node<W, A> {
    /// Create an all-free node for a subtree covering `span` slots.
    ///
    /// A subtree of exactly `F * F` slots is a leaf; anything larger is an
    /// inner node with no materialized children.
    pub fn vacant(span: u128) -> Self {
        if span == leaf_span::<W>() {
            Node::Leaf(LeafNode::new())
        } else {
            debug_assert!(span > leaf_span::<W>());
            Node::Inner(InnerNode::new())
        }
    }

    /// Return true if this node is a [`LeafNode`].
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// The free summary of this node. Bit `i` is set when word `i` (for a
    /// leaf) or child `i` (for an inner node) has a free slot.
    pub fn free_summary(&self) -> W {
        match self {
            Node::Leaf(leaf) => leaf.free,
            Node::Inner(inner) => inner.free,
        }
    }

    /// Return true if every slot below this node is allocated.
    pub fn is_full(&self) -> bool {
        self.free_summary() == W::ZERO
    }
}

impl<W: Word, A: Allocator> fmt::Debug for Node<W, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => f.debug_tuple("Leaf").field(leaf).finish(),
            Self::Inner(inner) => f.debug_tuple("Inner").field(inner).finish(),
        }
    }
}

/// Number of slots covered by a single leaf, `F * F`.
#[inline]
pub const fn leaf_span<W: Word>() -> u128 {
    (W::BITS * W::BITS) as u128
}

/// Bottom-level node tracking `F * F` slots in `F` words.
pub struct LeafNode<W: Word> {
    /// Bit `i` is set when `words[i]` is not zero.
    pub(crate) free: W,
    /// Slot bits, set means free.
    pub(crate) words: W::Array<W>,
}

impl<W: Word> LeafNode<W> {
    /// Create a leaf with every slot free.
    pub fn new() -> Self {
        LeafNode {
            free: W::ONES,
            words: W::array_from_fn(|_| W::ONES),
        }
    }

    /// The slot words of this leaf.
    pub fn words(&self) -> &[W] {
        self.words.as_ref()
    }

    /// See [`Node::free_summary`].
    pub fn free_summary(&self) -> W {
        self.free
    }

    /// Return true if slot `bit` of word `word` is free.
    #[inline]
    pub fn is_free(&self, word: usize, bit: usize) -> bool {
        self.words.as_ref()[word].test_bit(bit)
    }

    /// Mark slot `bit` of word `word` as allocated.
    pub(crate) fn claim(&mut self, word: usize, bit: usize) -> Update {
        let bits = &mut self.words.as_mut()[word];
        if !bits.test_bit(bit) {
            return Update::UNCHANGED;
        }

        bits.clear_bit(bit);
        if *bits != W::ZERO {
            return Update::CHANGED;
        }

        self.free.clear_bit(word);
        Update {
            changed: true,
            flipped: self.free == W::ZERO,
        }
    }

    /// Position `(word, bit)` of the lowest free slot, or `None` if the leaf
    /// is full.
    pub(crate) fn first_free(&self) -> Option<(usize, usize)> {
        let word = self.free.lowest_set_bit()?;
        let bit = self.words.as_ref()[word].lowest_set_bit()?;
        Some((word, bit))
    }

    /// Mark slot `bit` of word `word` as free.
    pub(crate) fn release(&mut self, word: usize, bit: usize) -> Update {
        let bits = &mut self.words.as_mut()[word];
        if bits.test_bit(bit) {
            return Update::UNCHANGED;
        }

        let was_empty = *bits == W::ZERO;
        bits.set_bit(bit);
        if !was_empty {
            return Update::CHANGED;
        }

        let was_full = self.free == W::ZERO;
        self.free.set_bit(word);
        Update {
            changed: true,
            flipped: was_full,
        }
    }

    /// Number of allocated slots in this leaf.
    pub fn allocated(&self) -> u64 {
        self.words
            .as_ref()
            .iter()
            .map(|bits| u64::from((!*bits).count_ones()))
            .sum()
    }
}

impl<W: Word> Default for LeafNode<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Word> Clone for LeafNode<W> {
    fn clone(&self) -> Self {
        LeafNode {
            free: self.free,
            words: W::array_from_fn(|idx| self.words.as_ref()[idx]),
        }
    }
}

impl<W: Word> fmt::Debug for LeafNode<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafNode")
            .field("free", &format_args!("{:#b}", self.free))
            .field("words", &self.words.as_ref())
            .finish()
    }
}

/// Node above the bottom level, referencing up to `F` lazily materialized
/// children.
pub struct InnerNode<W: Word, A: Allocator = Global> {
    /// Bit `i` is set when child `i` has a free slot. Unmaterialized children
    /// are entirely free, so their bits are always set.
    pub(crate) free: W,
    /// Bit `i` is set when `children[i]` is `Some`.
    pub(crate) materialized: W,
    pub(crate) children: W::Array<ChildPtr<W, A>>,
}

impl<W: Word, A: Allocator> InnerNode<W, A> {
    /// Create an inner node with no materialized children.
    pub fn new() -> Self {
        InnerNode {
            free: W::ONES,
            materialized: W::ZERO,
            children: W::array_from_fn(|_| None),
        }
    }

    /// Create an inner node whose first child is `child`, which is how an
    /// existing root is wrapped when the tree grows.
    pub fn with_first_child(child: Box<Node<W, A>, A>) -> Self {
        let mut node = Self::new();
        if child.is_full() {
            node.free.clear_bit(0);
        }
        node.materialized.set_bit(0);
        node.children.as_mut()[0] = Some(child);
        node
    }

    /// See [`Node::free_summary`].
    pub fn free_summary(&self) -> W {
        self.free
    }

    /// Bitmap of materialized children.
    pub fn materialized(&self) -> W {
        self.materialized
    }

    /// Return the child at `bucket`, if it has been materialized.
    #[inline]
    pub fn child(&self, bucket: usize) -> Option<&Node<W, A>> {
        self.children.as_ref()[bucket].as_deref()
    }

    /// Mutable version of [`InnerNode::child`].
    #[inline]
    pub fn child_mut(&mut self, bucket: usize) -> Option<&mut Node<W, A>> {
        self.children.as_mut()[bucket].as_deref_mut()
    }

    /// Iterate over the materialized children with their bucket.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Node<W, A>)> + '_ {
        self.children
            .as_ref()
            .iter()
            .enumerate()
            .filter_map(|(bucket, child)| child.as_deref().map(|child| (bucket, child)))
    }

    /// Return the child at `bucket`, materializing an all-free child covering
    /// `child_span` slots if it is missing.
    pub(crate) fn materialize(
        &mut self,
        bucket: usize,
        child_span: u128,
        alloc: &A,
    ) -> Result<&mut Node<W, A>, crate::TreeError>
    where
        A: Clone,
    {
        let slot = &mut self.children.as_mut()[bucket];
        let child = match slot {
            Some(child) => child,
            None => {
                let child = crate::allocator::try_box(Node::vacant(child_span), alloc.clone())?;
                log::trace!("materialized node at bucket {bucket} covering {child_span} slots");
                self.materialized.set_bit(bucket);
                slot.insert(child)
            },
        };

        Ok(&mut **child)
    }

    /// Record that the child at `bucket` became full.
    pub(crate) fn mark_full(&mut self, bucket: usize) -> Update {
        debug_assert!(self.free.test_bit(bucket));
        self.free.clear_bit(bucket);
        Update {
            changed: true,
            flipped: self.free == W::ZERO,
        }
    }

    /// Record that the child at `bucket` stopped being full.
    pub(crate) fn mark_free(&mut self, bucket: usize) -> Update {
        debug_assert!(!self.free.test_bit(bucket));
        let was_full = self.free == W::ZERO;
        self.free.set_bit(bucket);
        Update {
            changed: true,
            flipped: was_full,
        }
    }

    /// Detach every materialized child, leaving the node childless.
    pub(crate) fn take_children(&mut self) -> impl Iterator<Item = Box<Node<W, A>, A>> + '_ {
        self.materialized = W::ZERO;
        self.free = W::ONES;
        self.children.as_mut().iter_mut().filter_map(Option::take)
    }
}

impl<W: Word, A: Allocator> Default for InnerNode<W, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Word, A: Allocator> fmt::Debug for InnerNode<W, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InnerNode")
            .field("free", &format_args!("{:#b}", self.free))
            .field("materialized", &format_args!("{:#b}", self.materialized))
            .field("children", &self.children.as_ref())
            .finish()
    }
}

/// The effect of a single slot change on one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Update {
    /// The slot changed state. When false nothing in the node changed.
    pub changed: bool,
    /// The node changed between full and not full, so the parent's summary
    /// bit for it must flip as well.
    pub flipped: bool,
}

impl Update {
    pub const UNCHANGED: Update = Update {
        changed: false,
        flipped: false,
    };
    pub const CHANGED: Update = Update {
        changed: true,
        flipped: false,
    };
}
