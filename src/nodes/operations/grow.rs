use crate::{
    allocator::{try_box, Allocator, Box},
    InnerNode, Node, TreeError, Word,
};
use core::mem;

/// Put the current root under a new inner root as its first child.
///
/// The new root covers `F` times the slots of the old one. Its summary bit
/// for the old root is clear only if the old root was completely full; every
/// other child is unmaterialized and therefore free.
///
/// The new node is allocated before the tree is touched, so on failure the
/// tree is unchanged.
pub(crate) fn wrap_root<W: Word, A: Allocator + Clone>(
    root: &mut Box<Node<W, A>, A>,
    alloc: &A,
) -> Result<(), TreeError> {
    let new_root = try_box(Node::Inner(InnerNode::new()), alloc.clone())?;
    let old_root = mem::replace(root, new_root);
    **root = Node::Inner(InnerNode::with_first_child(old_root));

    Ok(())
}
