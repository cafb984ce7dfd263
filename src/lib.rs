//! # treefs - Recursive Filesystem Tree Operations
//!
//! treefs layers whole-tree operations on top of a small set of primitive
//! filesystem calls. Any backend that implements [`fs::Filesystem`] gains:
//!
//! - **ensure_dir** ("mkdirp"): create a path with all missing ancestors
//! - **copy_tree** ("copyDir"): copy a directory subtree
//! - **remove_tree** ("rmdirp"): delete a directory subtree
//! - **list_tree** ("readdirp"): enumerate every entry under a root
//! - **copy_file**: copy a single file, the leaf step of `copy_tree`
//!
//! Sibling entries of a directory are processed concurrently on tokio tasks;
//! results keep the filesystem's enumeration order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use treefs::config::TreeConfig;
//! use treefs::core::TreeFs;
//! use std::path::Path;
//!
//! # async fn demo() -> treefs::Result<()> {
//! let fs = TreeFs::disk(TreeConfig::default());
//!
//! fs.ensure_dir(Path::new("/tmp/demo/a/b")).await?;
//! fs.copy_tree(Path::new("/tmp/demo"), Path::new("/tmp/demo-copy")).await?;
//!
//! for path in fs.list_tree(Path::new("/tmp/demo-copy")).await? {
//!     println!("{}", path.display());
//! }
//!
//! fs.remove_tree(Path::new("/tmp/demo-copy")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Choosing Operations
//!
//! ```no_run
//! use treefs::config::{Operation, TreeConfig};
//! use treefs::core::compose;
//! use treefs::fs::MemFs;
//!
//! // An in-memory filesystem that can create and list, but never delete
//! let fs = compose(
//!     MemFs::new(),
//!     TreeConfig::default().without(Operation::RemoveTree),
//! );
//! assert!(!fs.supports(Operation::RemoveTree));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod tree;

// Re-export commonly used types
pub use config::{Operation, TreeConfig};
pub use core::{compose, TreeFs};
pub use error::{Result, TreeError};
pub use fs::{DiskFs, Filesystem, MemFs};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use treefs::prelude::*;
    //! ```

    pub use crate::config::{Operation, TreeConfig};
    pub use crate::core::{compose, TreeFs};
    pub use crate::error::{Result, TreeError};
    pub use crate::fs::{DiskFs, FileKind, FileStat, Filesystem, MemFs};
    pub use crate::tree::{copy_file, copy_tree, ensure_dir, list_tree, remove_tree, CopyOptions, PathKind};
}
