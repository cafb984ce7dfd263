//! Composition of primitive filesystems with tree operations

mod treefs;

pub use treefs::*;
