//! Recursive directory copy
//!
//! Directories are walked depth-first with one task per entry. Destination
//! directories are created lazily: an empty source directory is replicated
//! directly, every other destination directory comes into existence when the
//! first file is written into it.

use crate::config::DEFAULT_BUFFER_SIZE;
use crate::error::{IoResultExt, Primitive, Result, TreeError};
use crate::fs::Filesystem;
use crate::tree::fanout::join_ordered;
use crate::tree::{classify, ensure_dir, PathKind};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufReader};

/// Options for copy operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    /// Buffer size for stream transfers
    pub buffer_size: usize,
    /// Mode for directories created in the destination
    pub dir_mode: Option<u32>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            dir_mode: None,
        }
    }
}

/// Copy one regular file, creating the destination's parent directory.
///
/// The destination is overwritten if present. Returns the number of bytes
/// copied.
pub async fn copy_file<F: Filesystem + ?Sized>(
    fs: &F,
    source: &Path,
    dest: &Path,
    options: &CopyOptions,
) -> Result<u64> {
    match classify(fs, source).await? {
        PathKind::File => {}
        PathKind::Missing => {
            return Err(TreeError::NotFound {
                path: source.to_path_buf(),
            })
        }
        PathKind::Directory | PathKind::Other => {
            return Err(TreeError::NotAFile {
                path: source.to_path_buf(),
            })
        }
    }

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(fs, parent, options.dir_mode).await?;
    }

    // Both streams are dropped, and so closed, before this returns
    let reader = fs.open_read(source).await.for_op(Primitive::OpenRead, source)?;
    let mut writer = fs.open_write(dest).await.for_op(Primitive::OpenWrite, dest)?;
    let mut reader = BufReader::with_capacity(options.buffer_size.max(1), reader);

    let bytes = tokio::io::copy_buf(&mut reader, &mut writer)
        .await
        .for_op(Primitive::Transfer, source)?;
    writer.shutdown().await.for_op(Primitive::Transfer, dest)?;

    tracing::trace!("Copied {} -> {} ({} bytes)", source.display(), dest.display(), bytes);
    Ok(bytes)
}

/// Copy the directory tree at `source` into `dest`.
///
/// `dest` does not need to exist. Files already present in `dest` are
/// overwritten; nothing is removed. On failure, whatever was copied before
/// the error stays in place.
pub async fn copy_tree<F: Filesystem + ?Sized + 'static>(
    fs: Arc<F>,
    source: &Path,
    dest: &Path,
    options: CopyOptions,
) -> Result<()> {
    tracing::debug!("Copying tree {} -> {}", source.display(), dest.display());
    copy_dir(fs, source.to_path_buf(), dest.to_path_buf(), options).await
}

fn copy_dir<F: Filesystem + ?Sized + 'static>(
    fs: Arc<F>,
    source: PathBuf,
    dest: PathBuf,
    options: CopyOptions,
) -> BoxFuture<'static, Result<()>> {
    async move {
        let entries = fs.read_dir(&source).await.for_op(Primitive::ReadDir, &source)?;

        if entries.is_empty() {
            return ensure_dir(&*fs, &dest, options.dir_mode).await;
        }

        let tasks = entries.into_iter().map(|name| {
            copy_entry(Arc::clone(&fs), source.join(&name), dest.join(&name), options)
        });

        join_ordered(tasks).await?;
        Ok(())
    }
    .boxed()
}

async fn copy_entry<F: Filesystem + ?Sized + 'static>(
    fs: Arc<F>,
    from: PathBuf,
    to: PathBuf,
    options: CopyOptions,
) -> Result<()> {
    match classify(&*fs, &from).await? {
        PathKind::Directory => copy_dir(fs, from, to, options).await,
        _ => copy_file(&*fs, &from, &to, &options).await.map(|_| ()),
    }
}
