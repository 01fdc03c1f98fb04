use super::descend;
use crate::{allocator::Allocator, nodes::representation::Update, Node, Word};
use alloc::vec::Vec;

/// Mark `index` free in the subtree rooted at `node`, which covers `span`
/// slots.
///
/// Releasing a free index, including one below an unmaterialized child,
/// changes nothing. When a full subtree gets a free slot back, the summary
/// bit for it is set in its parent, and so on up for as long as subtrees stop
/// being full. Nodes are never released here.
pub(crate) fn release<W: Word, A: Allocator>(
    node: &mut Node<W, A>,
    span: u128,
    index: u128,
) -> Update {
    let (bucket, offset, child_span) = descend::<W>(span, index);

    match node {
        Node::Leaf(leaf) => leaf.release(bucket, offset as usize),
        Node::Inner(inner) => {
            let Some(child) = inner.child_mut(bucket) else {
                return Update::UNCHANGED;
            };
            let update = release(child, child_span, offset);

            if update.flipped {
                inner.mark_free(bucket)
            } else {
                update
            }
        },
    }
}

/// Deallocate every node below `root`, leaving `root` itself childless.
///
/// This uses an explicit stack instead of recursion, so the depth of the tree
/// does not bound the call stack. Returns the number of nodes deallocated.
pub(crate) fn deallocate_descendants<W: Word, A: Allocator>(root: &mut Node<W, A>) -> usize {
    let mut count = 0;
    let mut stack = Vec::new();

    if let Node::Inner(inner) = root {
        stack.extend(inner.take_children());
    }

    while let Some(mut node) = stack.pop() {
        if let Node::Inner(inner) = &mut *node {
            stack.extend(inner.take_children());
        }

        drop(node);
        count += 1;
    }

    count
}
