pub mod allocate;
pub mod allocate_at;
pub mod clone;
pub mod deallocate;
