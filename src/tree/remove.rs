//! Recursive directory removal

use crate::error::{IoResultExt, Primitive, Result, TreeError};
use crate::fs::Filesystem;
use crate::tree::fanout::join_ordered;
use crate::tree::{classify_link, PathKind};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Remove the directory `dir` and everything below it.
///
/// A `dir` that does not exist is treated as already removed. Pointing this
/// at a regular file fails, since enumerating it fails. Symlinks inside the
/// tree are unlinked, never followed.
pub async fn remove_tree<F: Filesystem + ?Sized + 'static>(fs: Arc<F>, dir: &Path) -> Result<()> {
    tracing::debug!("Removing tree {}", dir.display());
    remove_dir(fs, dir.to_path_buf()).await
}

fn remove_dir<F: Filesystem + ?Sized + 'static>(
    fs: Arc<F>,
    dir: PathBuf,
) -> BoxFuture<'static, Result<()>> {
    async move {
        let entries = match fs.read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} already gone", dir.display());
                return Ok(());
            }
            Err(e) => return Err(TreeError::io(Primitive::ReadDir, &dir, e)),
        };

        if !entries.is_empty() {
            let tasks = entries
                .into_iter()
                .map(|name| remove_entry(Arc::clone(&fs), dir.join(&name)));
            join_ordered(tasks).await?;
        }

        fs.rmdir(&dir).await.for_op(Primitive::Rmdir, &dir)
    }
    .boxed()
}

async fn remove_entry<F: Filesystem + ?Sized + 'static>(fs: Arc<F>, path: PathBuf) -> Result<()> {
    match classify_link(&*fs, &path).await? {
        PathKind::Directory => remove_dir(fs, path).await,
        PathKind::Missing => Ok(()),
        PathKind::File | PathKind::Other => fs.unlink(&path).await.for_op(Primitive::Unlink, &path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::inject::{InjectFs, VanishingFs};
    use crate::fs::{DiskFs, MemFs};
    use tempfile::TempDir;

    fn populated() -> MemFs {
        let fs = MemFs::new();
        fs.create_dir_all("/doomed/one/two/three").unwrap();
        fs.create_dir_all("/doomed/empty").unwrap();
        fs.write_file("/doomed/top.txt", "top").unwrap();
        fs.write_file("/doomed/one/1.txt", "one").unwrap();
        fs.write_file("/doomed/one/two/2.txt", "two").unwrap();
        fs.write_file("/doomed/one/two/three/3.txt", "three").unwrap();
        fs.write_file("/kept/sibling.txt", "stays").unwrap();
        fs
    }

    #[tokio::test]
    async fn test_removes_nested_tree() {
        let fs = Arc::new(populated());

        remove_tree(Arc::clone(&fs), Path::new("/doomed")).await.unwrap();

        assert!(!fs.exists("/doomed"));
        assert_eq!(fs.read_file("/kept/sibling.txt").unwrap(), b"stays");
    }

    #[tokio::test]
    async fn test_missing_target_is_not_an_error() {
        let fs = Arc::new(MemFs::new());
        remove_tree(Arc::clone(&fs), Path::new("/never/was")).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_target_fails() {
        let fs = Arc::new(MemFs::new());
        fs.write_file("/plain.txt", "x").unwrap();

        let err = remove_tree(Arc::clone(&fs), Path::new("/plain.txt")).await.unwrap_err();
        assert!(err.is_not_a_directory());
        assert!(fs.exists("/plain.txt"));
    }

    #[tokio::test]
    async fn test_unlink_error_propagates() {
        let fs = Arc::new(InjectFs::new(populated()).fail(Primitive::Unlink, "Some Unlink Error"));

        let err = remove_tree(Arc::clone(&fs), Path::new("/doomed")).await.unwrap_err();
        assert_eq!(err.to_string(), "Some Unlink Error");
        assert!(matches!(err, TreeError::Io { op: Primitive::Unlink, .. }));
    }

    #[tokio::test]
    async fn test_stat_error_propagates() {
        let fs = Arc::new(InjectFs::new(populated()).fail(Primitive::Stat, "Some Stats Error"));

        let err = remove_tree(Arc::clone(&fs), Path::new("/doomed")).await.unwrap_err();
        assert_eq!(err.to_string(), "Some Stats Error");
        assert!(fs.calls_to(Primitive::Rmdir).is_empty());
    }

    #[tokio::test]
    async fn test_rmdir_error_propagates() {
        let fs = Arc::new(InjectFs::new(populated()).fail(Primitive::Rmdir, "Some Rmdir Error"));

        let err = remove_tree(Arc::clone(&fs), Path::new("/doomed")).await.unwrap_err();
        assert_eq!(err.to_string(), "Some Rmdir Error");
    }

    #[tokio::test]
    async fn test_children_removed_before_parent() {
        let plain = MemFs::new();
        plain.create_dir_all("/outer/inner").unwrap();
        let fs = Arc::new(InjectFs::new(plain));

        remove_tree(Arc::clone(&fs), Path::new("/outer")).await.unwrap();

        assert_eq!(
            fs.calls_to(Primitive::Rmdir),
            vec![PathBuf::from("/outer/inner"), PathBuf::from("/outer")]
        );
        for dir in ["/outer/inner", "/outer"] {
            let err = fs.stat(Path::new(dir)).await.unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::NotFound);
        }
    }

    #[tokio::test]
    async fn test_vanished_entries_count_as_removed() {
        let fs = Arc::new(VanishingFs::new(populated(), "ghost"));

        remove_tree(Arc::clone(&fs), Path::new("/doomed")).await.unwrap();

        let err = fs.stat(Path::new("/doomed")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(fs.stat(Path::new("/kept/sibling.txt")).await.unwrap().is_file());
    }

    #[tokio::test]
    async fn test_on_disk() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("doomed");
        std::fs::create_dir_all(root.join("a/b")).unwrap();
        std::fs::write(root.join("a/file.txt"), b"data").unwrap();
        std::fs::write(root.join("a/b/file.txt"), b"data").unwrap();

        remove_tree(Arc::new(DiskFs::new()), &root).await.unwrap();
        assert!(!root.exists());
        assert!(dir.path().exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_links_out_of_the_tree_are_not_followed() {
        let dir = TempDir::new().unwrap();
        let outside = dir.path().join("outside");
        std::fs::create_dir_all(&outside).unwrap();
        std::fs::write(outside.join("keep.txt"), b"precious").unwrap();

        let root = dir.path().join("doomed");
        std::fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

        remove_tree(Arc::new(DiskFs::new()), &root).await.unwrap();
        assert!(!root.exists());
        assert_eq!(std::fs::read(outside.join("keep.txt")).unwrap(), b"precious");
    }
}
