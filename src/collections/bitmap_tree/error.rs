use core::{alloc::Layout, error::Error, fmt};

/// Errors reported by [`BitmapTree`](crate::BitmapTree) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// Every index below the limit of the tree is allocated.
    CapacityExhausted {
        /// The exclusive index limit of the tree
        limit: u128,
    },
    /// The requested index is not below the limit of the tree.
    IndexOutOfRange {
        /// The requested index
        index: u64,
        /// The exclusive index limit of the tree
        limit: u128,
    },
    /// The allocator could not provide memory for a new node.
    AllocationFailure {
        /// The layout of the node that could not be allocated
        layout: Layout,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::CapacityExhausted { limit } => {
                write!(
                    f,
                    "Every index below the tree limit [{limit}] is already allocated"
                )
            },
            TreeError::IndexOutOfRange { index, limit } => {
                write!(
                    f,
                    "Attempted to allocate index [{index}] which is not below the tree limit \
                     [{limit}]"
                )
            },
            TreeError::AllocationFailure { layout } => {
                write!(
                    f,
                    "Unable to allocate a tree node of [{}] bytes",
                    layout.size()
                )
            },
        }
    }
}

impl Error for TreeError {}
