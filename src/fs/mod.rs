//! File system backends module
//!
//! Defines the primitive `Filesystem` trait the tree operations are built
//! on, plus a disk backend and an in-memory backend.

mod primitives;
pub mod disk;
pub mod memory;

#[cfg(test)]
pub(crate) mod inject;

pub use primitives::*;
pub use disk::DiskFs;
pub use memory::MemFs;
