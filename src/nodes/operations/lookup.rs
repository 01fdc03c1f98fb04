use crate::{allocator::Allocator, Node, Word};

/// Split `index`, relative to a node covering `span` slots, into the bucket
/// holding it, the offset inside that bucket and the span of the bucket.
///
/// At a leaf the bucket is the word and the offset is the bit.
#[inline]
pub(crate) fn descend<W: Word>(span: u128, index: u128) -> (usize, u128, u128) {
    let child_span = span / W::BITS as u128;
    ((index / child_span) as usize, index % child_span, child_span)
}

/// Return true if `index` is allocated in the tree rooted at `root`.
///
/// Indices at or beyond `span` were never covered by the tree and are always
/// free, as is every index below an unmaterialized child.
pub(crate) fn is_allocated<W: Word, A: Allocator>(
    root: &Node<W, A>,
    span: u128,
    index: u128,
) -> bool {
    if index >= span {
        return false;
    }

    let mut current_node = root;
    let mut span = span;
    let mut index = index;
    loop {
        let (bucket, offset, child_span) = descend::<W>(span, index);

        match current_node {
            Node::Leaf(leaf) => return !leaf.is_free(bucket, offset as usize),
            Node::Inner(inner) => match inner.child(bucket) {
                Some(child) => {
                    current_node = child;
                    span = child_span;
                    index = offset;
                },
                None => return false,
            },
        }
    }
}
