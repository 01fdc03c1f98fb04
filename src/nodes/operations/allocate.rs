use super::descend;
use crate::{allocator::Allocator, nodes::representation::Update, Node, TreeError, Word};

/// Mark `index` allocated in the subtree rooted at `node`, which covers
/// `span` slots, materializing missing nodes along the way.
///
/// Claiming an already allocated index changes nothing. When the claim fills
/// a subtree, the summary bit for it is cleared in its parent, and so on up
/// for as long as subtrees keep becoming full.
pub(crate) fn claim_at<W: Word, A: Allocator + Clone>(
    node: &mut Node<W, A>,
    span: u128,
    index: u128,
    alloc: &A,
) -> Result<Update, TreeError> {
    let (bucket, offset, child_span) = descend::<W>(span, index);

    match node {
        Node::Leaf(leaf) => Ok(leaf.claim(bucket, offset as usize)),
        Node::Inner(inner) => {
            let child = inner.materialize(bucket, child_span, alloc)?;
            let update = claim_at(child, child_span, offset, alloc)?;

            if update.flipped {
                Ok(inner.mark_full(bucket))
            } else {
                Ok(update)
            }
        },
    }
}

/// Claim the lowest free index in the subtree rooted at `node`, whose first
/// index is `base`, and return it.
///
/// The subtree must not be full. Returns
/// [`TreeError::CapacityExhausted`] without modifying anything if the lowest
/// free index is not below `limit`.
pub(crate) fn claim_first<W: Word, A: Allocator + Clone>(
    node: &mut Node<W, A>,
    span: u128,
    base: u128,
    limit: u128,
    alloc: &A,
) -> Result<(u128, Update), TreeError> {
    match node {
        Node::Leaf(leaf) => {
            let Some((word, bit)) = leaf.first_free() else {
                unreachable!("free summary bit set for a full leaf word")
            };

            let index = base + (word * W::BITS + bit) as u128;
            if index >= limit {
                return Err(TreeError::CapacityExhausted { limit });
            }

            Ok((index, leaf.claim(word, bit)))
        },
        Node::Inner(inner) => {
            let Some(bucket) = inner.free.lowest_set_bit() else {
                unreachable!("free summary bit set for a full child")
            };

            let child_span = span / W::BITS as u128;
            let child_base = base + bucket as u128 * child_span;
            if child_base >= limit {
                return Err(TreeError::CapacityExhausted { limit });
            }

            let child = inner.materialize(bucket, child_span, alloc)?;
            let (index, update) = claim_first(child, child_span, child_base, limit, alloc)?;

            if update.flipped {
                Ok((index, inner.mark_full(bucket)))
            } else {
                Ok((index, update))
            }
        },
    }
}
