//! Memory allocation for tree nodes.
//!
//! Nodes are owned through [`allocator_api2::boxed::Box`], so a tree can be
//! backed by any allocator implementing [`Allocator`]. With the `nightly`
//! feature `allocator-api2` re-exports the unstable `core` allocator API
//! instead of its own copy, and the two are interchangeable.

use core::alloc::Layout;

pub use allocator_api2::{
    alloc::{AllocError, Allocator, Global},
    boxed::Box,
};

use crate::TreeError;

/// Box `value` in `alloc`, reporting failure as
/// [`TreeError::AllocationFailure`] instead of aborting.
#[inline]
pub(crate) fn try_box<T, A: Allocator>(value: T, alloc: A) -> Result<Box<T, A>, TreeError> {
    Box::try_new_in(value, alloc).map_err(|AllocError| {
        let layout = Layout::new::<T>();
        log::debug!("node allocation of {} bytes failed", layout.size());
        TreeError::AllocationFailure { layout }
    })
}
