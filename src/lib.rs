#![no_std]
#![deny(
    missing_docs,
    clippy::missing_safety_doc,
    unsafe_code,
    deprecated_in_future,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    rustdoc::invalid_codeblock_attributes
)]
#![doc(
    html_playground_url = "https://play.rust-lang.org/",
    test(attr(deny(warnings)))
)]

//! Growable index allocator built on a multi-way tree of bitmaps
//!
//! A [`BitmapTree`] hands out and takes back unique `u64` indices. Each node
//! of the tree is a bitmap the width of a machine word: leaves track
//! individual slots, and inner nodes track which children still have a free
//! slot. The tree grows new root levels on demand and materializes subtrees
//! lazily, so a sparse set of large indices stays small in memory while
//! finding the lowest free index costs one word scan per level.

extern crate alloc;

#[cfg(test)]
extern crate std;

mod allocator;
mod collections;
mod nodes;
mod word;

pub use collections::*;
pub use nodes::{visitor, ChildPtr, InnerNode, LeafNode, Node};
pub use word::Word;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
