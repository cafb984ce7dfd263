//! Recursive tree operations
//!
//! Every operation here is built only from the [`Filesystem`](crate::fs::Filesystem)
//! primitives:
//!
//! - [`ensure_dir`]: create a directory and its missing ancestors
//! - [`copy_tree`]: copy a whole subtree, one task per entry
//! - [`remove_tree`]: delete a whole subtree, children before parents
//! - [`list_tree`]: enumerate a subtree depth-first
//! - [`copy_file`]: stream one file, the leaf step of [`copy_tree`]
//!
//! Paths are classified through [`classify`]; only a stat `NotFound` counts
//! as a missing path, every other primitive failure is returned to the caller.

mod classify;
mod copy;
pub(crate) mod fanout;
mod list;
mod mkdir;
mod remove;

pub use classify::{classify, classify_link, PathKind};
pub use copy::{copy_file, copy_tree, CopyOptions};
pub use list::list_tree;
pub use mkdir::ensure_dir;
pub use remove::remove_tree;
