//! Recursive directory creation

use crate::error::{Primitive, Result, TreeError};
use crate::fs::Filesystem;
use crate::tree::{classify, PathKind};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::io;
use std::path::Path;

/// Create `path` and every missing ancestor, all with `mode`.
///
/// Succeeds when `path` already is a directory. Fails with
/// [`TreeError::NotADirectory`] when it exists as anything else. Directories
/// that already exist keep their mode.
pub async fn ensure_dir<F: Filesystem + ?Sized>(
    fs: &F,
    path: &Path,
    mode: Option<u32>,
) -> Result<()> {
    ensure_dir_inner(fs, path, mode).await
}

fn ensure_dir_inner<'a, F: Filesystem + ?Sized>(
    fs: &'a F,
    path: &'a Path,
    mode: Option<u32>,
) -> BoxFuture<'a, Result<()>> {
    async move {
        match fs.mkdir(path, mode).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    Some(parent) => parent,
                    None => return Err(TreeError::io(Primitive::Mkdir, path, e)),
                };

                tracing::trace!("Parent of {} missing, creating {}", path.display(), parent.display());
                ensure_dir_inner(fs, parent, mode).await?;

                // Re-validate against the filesystem instead of trusting the parent step
                match fs.mkdir(path, mode).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                        require_directory(fs, path).await
                    }
                    Err(e) => Err(TreeError::io(Primitive::Mkdir, path, e)),
                }
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => require_directory(fs, path).await,
            Err(e) => Err(TreeError::io(Primitive::Mkdir, path, e)),
        }
    }
    .boxed()
}

// An existing entry only satisfies the request if it is a directory.
async fn require_directory<F: Filesystem + ?Sized>(fs: &F, path: &Path) -> Result<()> {
    match classify(fs, path).await? {
        PathKind::Directory => Ok(()),
        PathKind::Missing => Err(TreeError::NotFound {
            path: path.to_path_buf(),
        }),
        PathKind::File | PathKind::Other => Err(TreeError::NotADirectory {
            path: path.to_path_buf(),
        }),
    }
}
