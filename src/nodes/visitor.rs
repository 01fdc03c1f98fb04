//! Utilities for inspecting the tree structure.

mod tree_stats;
mod well_formed;

use crate::{allocator::Allocator, BitmapTree, InnerNode, LeafNode, Node, Word};
pub use tree_stats::*;
pub use well_formed::*;

/// The `Visitable` trait allows [`Visitor`]s to traverse the structure of the
/// implementing type and produce some output.
pub trait Visitable<W: Word, A: Allocator> {
    /// This function provides the default traversal behavior for the
    /// implementing type.
    ///
    /// The implementation should call `visit_with(visitor)` for all relevant
    /// sub-fields of the type. If there are no relevant sub-fields, it should
    /// just produce the default output.
    fn super_visit_with<V: Visitor<W, A>>(&self, visitor: &mut V) -> V::Output;

    /// This function will traverse the implementing type and execute any
    /// specific logic from the given [`Visitor`].
    ///
    /// Types with a corresponding hook in the [`Visitor`] trait override this
    /// to call that hook, like [`InnerNode`] calling
    /// [`Visitor::visit_inner`].
    fn visit_with<V: Visitor<W, A>>(&self, visitor: &mut V) -> V::Output {
        self.super_visit_with(visitor)
    }
}

impl<W: Word, A: Allocator> Visitable<W, A> for BitmapTree<W, A> {
    fn super_visit_with<V: Visitor<W, A>>(&self, visitor: &mut V) -> V::Output {
        self.root().visit_with(visitor)
    }
}

impl<W: Word, A: Allocator> Visitable<W, A> for Node<W, A> {
    fn super_visit_with<V: Visitor<W, A>>(&self, visitor: &mut V) -> V::Output {
        match self {
            Node::Leaf(leaf) => <LeafNode<W> as Visitable<W, A>>::visit_with(leaf, visitor),
            Node::Inner(inner) => inner.visit_with(visitor),
        }
    }
}

impl<W: Word, A: Allocator> Visitable<W, A> for InnerNode<W, A> {
    fn super_visit_with<V: Visitor<W, A>>(&self, visitor: &mut V) -> V::Output {
        self.iter().fold(visitor.default_output(), |acc, (_, child)| {
            let child_output = child.visit_with(visitor);
            visitor.combine_output(acc, child_output)
        })
    }

    fn visit_with<V: Visitor<W, A>>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_inner(self)
    }
}

impl<W: Word, A: Allocator> Visitable<W, A> for LeafNode<W> {
    fn super_visit_with<V: Visitor<W, A>>(&self, visitor: &mut V) -> V::Output {
        visitor.default_output()
    }

    fn visit_with<V: Visitor<W, A>>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_leaf(self)
    }
}

/// The `Visitor` trait allows creating new operations on the bitmap tree by
/// overriding specific handling methods for each of the node types.
pub trait Visitor<W: Word, A: Allocator>: Sized {
    /// The type of value that the visitor produces.
    type Output;

    /// Produce the default value of the [`Self::Output`] type.
    fn default_output(&self) -> Self::Output;

    /// Combine two instances of the [`Self::Output`] type for this [`Visitor`].
    fn combine_output(&self, o1: Self::Output, o2: Self::Output) -> Self::Output;

    /// Visit an [`InnerNode`].
    fn visit_inner(&mut self, t: &InnerNode<W, A>) -> Self::Output {
        t.super_visit_with(self)
    }

    /// Visit a [`LeafNode`].
    fn visit_leaf(&mut self, t: &LeafNode<W>) -> Self::Output {
        <LeafNode<W> as Visitable<W, A>>::super_visit_with(t, self)
    }
}
