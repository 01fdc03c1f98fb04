//! Collection types built on top of the bitmap tree nodes.

pub mod bitmap_tree;
pub use bitmap_tree::{BitmapTree, TreeError, DEFAULT_LIMIT};
