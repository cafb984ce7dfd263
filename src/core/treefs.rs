//! Composed filesystem
//!
//! Wraps a primitive [`Filesystem`] together with a [`TreeConfig`]. The result
//! still exposes every primitive and adds whichever recursive operations the
//! config enables.

use crate::config::{Operation, TreeConfig};
use crate::error::{Result, TreeError};
use crate::fs::{DiskFs, FileStat, Filesystem, ReadStream, WriteStream};
use crate::tree::{self, CopyOptions};
use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A filesystem with recursive tree operations attached
#[derive(Debug)]
pub struct TreeFs<F: ?Sized> {
    config: TreeConfig,
    fs: Arc<F>,
}

impl<F: ?Sized> Clone for TreeFs<F> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            fs: Arc::clone(&self.fs),
        }
    }
}

/// Attach the operations enabled in `config` to `fs`.
pub fn compose<F: Filesystem + 'static>(fs: F, config: TreeConfig) -> TreeFs<F> {
    TreeFs::new(fs, config)
}

impl TreeFs<DiskFs> {
    /// Real filesystem with the given config
    pub fn disk(config: TreeConfig) -> Self {
        Self::new(DiskFs::new(), config)
    }
}

impl<F: Filesystem + 'static> TreeFs<F> {
    /// Wrap an owned filesystem
    pub fn new(fs: F, config: TreeConfig) -> Self {
        Self::from_arc(Arc::new(fs), config)
    }
}

impl<F: Filesystem + ?Sized + 'static> TreeFs<F> {
    /// Wrap a shared filesystem
    pub fn from_arc(fs: Arc<F>, config: TreeConfig) -> Self {
        tracing::debug!(
            "Composing filesystem with {}",
            config
                .enabled
                .iter()
                .map(Operation::name)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self { config, fs }
    }

    /// The wrapped primitive filesystem
    pub fn inner(&self) -> &Arc<F> {
        &self.fs
    }

    /// Active configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Whether `op` is available on this filesystem
    pub fn supports(&self, op: Operation) -> bool {
        self.config.is_enabled(op)
    }

    fn require(&self, op: Operation) -> Result<()> {
        if self.supports(op) {
            Ok(())
        } else {
            Err(TreeError::Disabled(op))
        }
    }

    fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            buffer_size: self.config.buffer_size,
            dir_mode: self.config.dir_mode,
        }
    }

    /// Create `path` and its missing ancestors with the configured mode
    pub async fn ensure_dir(&self, path: &Path) -> Result<()> {
        self.ensure_dir_with_mode(path, self.config.dir_mode).await
    }

    /// Create `path` and its missing ancestors with an explicit mode
    pub async fn ensure_dir_with_mode(&self, path: &Path, mode: Option<u32>) -> Result<()> {
        self.require(Operation::EnsureDir)?;
        tree::ensure_dir(&*self.fs, path, mode).await
    }

    /// Copy one file; returns the bytes copied
    pub async fn copy_file(&self, source: &Path, dest: &Path) -> Result<u64> {
        self.require(Operation::CopyFile)?;
        tree::copy_file(&*self.fs, source, dest, &self.copy_options()).await
    }

    /// Copy the tree at `source` into `dest`
    pub async fn copy_tree(&self, source: &Path, dest: &Path) -> Result<()> {
        self.require(Operation::CopyTree)?;
        tree::copy_tree(Arc::clone(&self.fs), source, dest, self.copy_options()).await
    }

    /// Delete the tree at `dir`
    pub async fn remove_tree(&self, dir: &Path) -> Result<()> {
        self.require(Operation::RemoveTree)?;
        tree::remove_tree(Arc::clone(&self.fs), dir).await
    }

    /// List the tree at `dir`
    pub async fn list_tree(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.require(Operation::ListTree)?;
        tree::list_tree(Arc::clone(&self.fs), dir).await
    }
}

#[async_trait]
impl<F: Filesystem + ?Sized + 'static> Filesystem for TreeFs<F> {
    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        self.fs.stat(path).await
    }

    async fn lstat(&self, path: &Path) -> io::Result<FileStat> {
        self.fs.lstat(path).await
    }

    async fn mkdir(&self, path: &Path, mode: Option<u32>) -> io::Result<()> {
        self.fs.mkdir(path, mode).await
    }

    async fn rmdir(&self, path: &Path) -> io::Result<()> {
        self.fs.rmdir(path).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        self.fs.read_dir(path).await
    }

    async fn unlink(&self, path: &Path) -> io::Result<()> {
        self.fs.unlink(path).await
    }

    async fn open_read(&self, path: &Path) -> io::Result<ReadStream> {
        self.fs.open_read(path).await
    }

    async fn open_write(&self, path: &Path) -> io::Result<WriteStream> {
        self.fs.open_write(path).await
    }
}
