//! Error types for treefs
//!
//! Primitive failures are carried through unchanged so callers see the
//! original message. The remaining variants are raised by the tree
//! algorithms themselves.

use crate::config::Operation;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Primitive filesystem call that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `stat`
    Stat,
    /// `mkdir`
    Mkdir,
    /// `rmdir`
    Rmdir,
    /// `read_dir`
    ReadDir,
    /// `unlink`
    Unlink,
    /// `open_read`
    OpenRead,
    /// `open_write`
    OpenWrite,
    /// Byte transfer between two open streams
    Transfer,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Primitive::Stat => "stat",
            Primitive::Mkdir => "mkdir",
            Primitive::Rmdir => "rmdir",
            Primitive::ReadDir => "readdir",
            Primitive::Unlink => "unlink",
            Primitive::OpenRead => "open_read",
            Primitive::OpenWrite => "open_write",
            Primitive::Transfer => "transfer",
        };
        f.write_str(name)
    }
}

/// Main error type for tree operations
#[derive(Error, Debug)]
pub enum TreeError {
    /// Failure reported by a filesystem primitive, message preserved
    #[error("{source}")]
    Io {
        /// Primitive that failed
        op: Primitive,
        /// Path the primitive was called with
        path: PathBuf,
        /// Original error
        #[source]
        source: io::Error,
    },

    /// Path is absent
    #[error("Path not found: {}", path.display())]
    NotFound {
        /// Missing path
        path: PathBuf,
    },

    /// Path exists but is not a directory
    #[error("Path {} already exists and is not a directory", path.display())]
    NotADirectory {
        /// Offending path
        path: PathBuf,
    },

    /// Path is not a regular file
    #[error("Path {} is not a file", path.display())]
    NotAFile {
        /// Offending path
        path: PathBuf,
    },

    /// Operation is not part of the composed capability set
    #[error("Operation '{0}' is not enabled")]
    Disabled(Operation),

    /// A sibling task was cancelled before it finished
    #[error("Tree task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TreeError {
    /// Wrap a primitive error with the call and path it came from
    pub fn io(op: Primitive, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Kind of the underlying primitive error, if this is one
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// Check if the target was absent
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            _ => self.io_kind() == Some(io::ErrorKind::NotFound),
        }
    }

    /// Check if a directory was expected and something else was found
    pub fn is_not_a_directory(&self) -> bool {
        match self {
            Self::NotADirectory { .. } => true,
            _ => self.io_kind() == Some(io::ErrorKind::NotADirectory),
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. }
            | Self::NotFound { path }
            | Self::NotADirectory { path }
            | Self::NotAFile { path } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for tree operations
pub type Result<T> = std::result::Result<T, TreeError>;

impl From<serde_json::Error> for TreeError {
    fn from(err: serde_json::Error) -> Self {
        TreeError::Config(err.to_string())
    }
}

/// Extension trait for attaching primitive context to `std::io::Result`
pub trait IoResultExt<T> {
    /// Tag an I/O error with the primitive and path that produced it
    fn for_op(self, op: Primitive, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn for_op(self, op: Primitive, path: &Path) -> Result<T> {
        self.map_err(|e| TreeError::io(op, path, e))
    }
}
