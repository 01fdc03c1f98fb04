//! Tree descent and manipulation over a root [`Node`](crate::Node).
//!
//! All functions here take the root of a (sub)tree together with `span`, the
//! number of slots that root covers. A leaf always covers `F * F` slots and
//! each inner level multiplies that by `F`.

mod allocate;
pub(crate) use allocate::*;

mod clone;
pub(crate) use clone::*;

mod deallocate;
pub(crate) use deallocate::*;

mod grow;
pub(crate) use grow::*;

mod lookup;
pub(crate) use lookup::*;
