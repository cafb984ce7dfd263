//! Recursive directory listing

use crate::error::{IoResultExt, Primitive, Result};
use crate::fs::Filesystem;
use crate::tree::fanout::join_ordered;
use crate::tree::{classify, PathKind};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// List `dir` and everything below it.
///
/// The result starts with `dir` itself, followed by each entry in the order
/// the filesystem enumerated it. A subdirectory is immediately followed by its
/// own listing. Entries that vanish between enumeration and stat are skipped.
pub async fn list_tree<F: Filesystem + ?Sized + 'static>(
    fs: Arc<F>,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let listing = list_dir(fs, dir.to_path_buf()).await?;
    tracing::debug!("Listed {} entries under {}", listing.len(), dir.display());
    Ok(listing)
}

fn list_dir<F: Filesystem + ?Sized + 'static>(
    fs: Arc<F>,
    dir: PathBuf,
) -> BoxFuture<'static, Result<Vec<PathBuf>>> {
    async move {
        let entries = fs.read_dir(&dir).await.for_op(Primitive::ReadDir, &dir)?;

        let tasks = entries
            .into_iter()
            .map(|name| list_entry(Arc::clone(&fs), dir.join(&name)));
        let nested = join_ordered(tasks).await?;

        let mut listing = Vec::with_capacity(1 + nested.iter().map(Vec::len).sum::<usize>());
        listing.push(dir);
        listing.extend(nested.into_iter().flatten());
        Ok(listing)
    }
    .boxed()
}

async fn list_entry<F: Filesystem + ?Sized + 'static>(
    fs: Arc<F>,
    path: PathBuf,
) -> Result<Vec<PathBuf>> {
    match classify(&*fs, &path).await? {
        PathKind::Directory => list_dir(fs, path).await,
        PathKind::Missing => Ok(Vec::new()),
        PathKind::File | PathKind::Other => Ok(vec![path]),
    }
}
