//! Path classification shared by every tree operation

use crate::error::{Primitive, Result, TreeError};
use crate::fs::{FileKind, Filesystem};
use std::io;
use std::path::Path;

/// What a path currently points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Nothing exists at the path
    Missing,
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Some other kind of entry
    Other,
}

impl From<FileKind> for PathKind {
    fn from(kind: FileKind) -> Self {
        match kind {
            FileKind::File => PathKind::File,
            FileKind::Directory => PathKind::Directory,
            FileKind::Other => PathKind::Other,
        }
    }
}

/// Stat `path` and classify it.
///
/// Only a `NotFound` error maps to [`PathKind::Missing`]; every other stat
/// failure is returned unchanged.
pub async fn classify<F: Filesystem + ?Sized>(fs: &F, path: &Path) -> Result<PathKind> {
    match fs.stat(path).await {
        Ok(stat) => Ok(stat.kind.into()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PathKind::Missing),
        Err(e) => Err(TreeError::io(Primitive::Stat, path, e)),
    }
}

/// Like [`classify`], but a symlink is reported as [`PathKind::Other`]
/// instead of the kind of its target.
pub async fn classify_link<F: Filesystem + ?Sized>(fs: &F, path: &Path) -> Result<PathKind> {
    match fs.lstat(path).await {
        Ok(stat) => Ok(stat.kind.into()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PathKind::Missing),
        Err(e) => Err(TreeError::io(Primitive::Stat, path, e)),
    }
}
