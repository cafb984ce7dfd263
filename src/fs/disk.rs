//! Primitives over the real filesystem

use crate::fs::{FileStat, Filesystem, ReadStream, WriteStream};
use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::Path;

/// The host filesystem, accessed through `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl DiskFs {
    /// Create a disk backend
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Filesystem for DiskFs {
    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(FileStat::from(&metadata))
    }

    async fn lstat(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = tokio::fs::symlink_metadata(path).await?;
        Ok(FileStat::from(&metadata))
    }

    async fn mkdir(&self, path: &Path, mode: Option<u32>) -> io::Result<()> {
        let mut builder = tokio::fs::DirBuilder::new();

        #[cfg(unix)]
        {
            if let Some(mode) = mode {
                builder.mode(mode);
            }
        }
        #[cfg(not(unix))]
        let _ = mode;

        builder.create(path).await
    }

    async fn rmdir(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_dir(path).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut reader = tokio::fs::read_dir(path).await?;
        let mut names = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            names.push(entry.file_name());
        }
        Ok(names)
    }

    async fn unlink(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    async fn open_read(&self, path: &Path) -> io::Result<ReadStream> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Box::new(file))
    }

    async fn open_write(&self, path: &Path) -> io::Result<WriteStream> {
        let file = tokio::fs::File::create(path).await?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_mkdir_error_kinds() {
        let dir = TempDir::new().unwrap();
        let fs = DiskFs::new();

        let target = dir.path().join("one");
        fs.mkdir(&target, None).await.unwrap();
        assert!(fs.stat(&target).await.unwrap().is_dir());

        let again = fs.mkdir(&target, None).await.unwrap_err();
        assert_eq!(again.kind(), io::ErrorKind::AlreadyExists);

        let orphan = fs.mkdir(&dir.path().join("x/y"), None).await.unwrap_err();
        assert_eq!(orphan.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_mkdir_mode() {
        let dir = TempDir::new().unwrap();
        let fs = DiskFs::new();

        let target = dir.path().join("private");
        fs.mkdir(&target, Some(0o700)).await.unwrap();
        assert_eq!(fs.stat(&target).await.unwrap().mode, Some(0o700));
    }

    #[tokio::test]
    async fn test_streams_and_listing() {
        let dir = TempDir::new().unwrap();
        let fs = DiskFs::new();
        let file = dir.path().join("note.txt");

        let mut writer = fs.open_write(&file).await.unwrap();
        writer.write_all(b"hello disk").await.unwrap();
        writer.shutdown().await.unwrap();
        drop(writer);

        let mut reader = fs.open_read(&file).await.unwrap();
        let mut contents = String::new();
        reader.read_to_string(&mut contents).await.unwrap();
        assert_eq!(contents, "hello disk");

        let stat = fs.stat(&file).await.unwrap();
        assert!(stat.is_file());
        assert_eq!(stat.len, 10);

        assert_eq!(
            fs.read_dir(dir.path()).await.unwrap(),
            vec![OsString::from("note.txt")]
        );

        let not_dir = fs.read_dir(&file).await.unwrap_err();
        assert_eq!(not_dir.kind(), io::ErrorKind::NotADirectory);

        fs.unlink(&file).await.unwrap();
        let gone = fs.stat(&file).await.unwrap_err();
        assert_eq!(gone.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_lstat_does_not_follow_links() {
        let dir = TempDir::new().unwrap();
        let fs = DiskFs::new();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        std::fs::create_dir(&target).unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(fs.stat(&link).await.unwrap().is_dir());
        assert_eq!(fs.lstat(&link).await.unwrap().kind, crate::fs::FileKind::Other);
        assert!(fs.lstat(&target).await.unwrap().is_dir());
    }
}
