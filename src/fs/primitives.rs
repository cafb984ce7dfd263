//! Primitive filesystem interface
//!
//! The non-recursive calls every tree operation is built from. Backends
//! report failures as plain `std::io::Error`s; the tree algorithms only
//! look at the `ErrorKind` to decide what counts as "already satisfied".

use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

/// Byte stream returned by [`Filesystem::open_read`]
pub type ReadStream = Box<dyn AsyncRead + Send + Unpin>;

/// Byte stream returned by [`Filesystem::open_write`]
pub type WriteStream = Box<dyn AsyncWrite + Send + Unpin>;

/// Kind of an existing filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Anything else (device, socket, fifo, ...)
    Other,
}

/// Metadata reported by [`Filesystem::stat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Entry kind
    pub kind: FileKind,
    /// Size in bytes
    pub len: u64,
    /// Permission bits, when the backend knows them
    pub mode: Option<u32>,
}

impl FileStat {
    /// Check if this is a directory
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    /// Check if this is a regular file
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }
}

impl From<&std::fs::Metadata> for FileStat {
    fn from(metadata: &std::fs::Metadata) -> Self {
        let file_type = metadata.file_type();
        let kind = if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        };

        #[cfg(unix)]
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            Some(metadata.permissions().mode() & 0o7777)
        };
        #[cfg(not(unix))]
        let mode = None;

        Self {
            kind,
            len: metadata.len(),
            mode,
        }
    }
}

/// Non-recursive filesystem calls.
///
/// Expected error kinds:
/// - `mkdir`: `AlreadyExists` when the path exists, `NotFound` when the parent is missing
/// - `read_dir`: `NotFound` for a missing path, `NotADirectory` for a non-directory
/// - `stat`, `lstat`: `NotFound` for a missing path
///
/// Anything else is passed through to the caller untouched.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Metadata for `path`, following the backend's native semantics
    async fn stat(&self, path: &Path) -> io::Result<FileStat>;

    /// Metadata for `path` itself, without following a final symlink.
    ///
    /// Backends without links can keep the default, which is [`stat`](Self::stat).
    async fn lstat(&self, path: &Path) -> io::Result<FileStat> {
        self.stat(path).await
    }

    /// Create one directory; `mode` is the permission mode, if any
    async fn mkdir(&self, path: &Path, mode: Option<u32>) -> io::Result<()>;

    /// Remove one empty directory
    async fn rmdir(&self, path: &Path) -> io::Result<()>;

    /// Names of the immediate entries of a directory, in native order
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Remove one non-directory entry
    async fn unlink(&self, path: &Path) -> io::Result<()>;

    /// Open a file for reading
    async fn open_read(&self, path: &Path) -> io::Result<ReadStream>;

    /// Create or truncate a file for writing
    async fn open_write(&self, path: &Path) -> io::Result<WriteStream>;
}

#[async_trait]
impl<F: Filesystem + ?Sized> Filesystem for Arc<F> {
    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        (**self).stat(path).await
    }

    async fn lstat(&self, path: &Path) -> io::Result<FileStat> {
        (**self).lstat(path).await
    }

    async fn mkdir(&self, path: &Path, mode: Option<u32>) -> io::Result<()> {
        (**self).mkdir(path, mode).await
    }

    async fn rmdir(&self, path: &Path) -> io::Result<()> {
        (**self).rmdir(path).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        (**self).read_dir(path).await
    }

    async fn unlink(&self, path: &Path) -> io::Result<()> {
        (**self).unlink(path).await
    }

    async fn open_read(&self, path: &Path) -> io::Result<ReadStream> {
        (**self).open_read(path).await
    }

    async fn open_write(&self, path: &Path) -> io::Result<WriteStream> {
        (**self).open_write(path).await
    }
}
