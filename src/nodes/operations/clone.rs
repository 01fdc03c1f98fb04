use crate::{
    allocator::{Allocator, Box},
    InnerNode, Node, Word,
};

/// Deep-copy `node` and every materialized node below it into `alloc`.
pub(crate) fn clone_node<W: Word, A: Allocator + Clone>(node: &Node<W, A>, alloc: &A) -> Node<W, A> {
    match node {
        Node::Leaf(leaf) => Node::Leaf(leaf.clone()),
        Node::Inner(inner) => Node::Inner(InnerNode {
            free: inner.free,
            materialized: inner.materialized,
            children: W::array_from_fn(|bucket| {
                inner
                    .child(bucket)
                    .map(|child| Box::new_in(clone_node(child, alloc), alloc.clone()))
            }),
        }),
    }
}
