//! Test backend that records primitive calls and injects failures

use crate::error::Primitive;
use crate::fs::{FileStat, Filesystem, ReadStream, WriteStream};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

pub(crate) struct InjectFs<F> {
    inner: F,
    failures: HashMap<Primitive, String>,
    calls: Mutex<Vec<(Primitive, PathBuf)>>,
}

impl<F: Filesystem> InjectFs<F> {
    pub(crate) fn new(inner: F) -> Self {
        Self {
            inner,
            failures: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every call of `op` fail with `message`
    pub(crate) fn fail(mut self, op: Primitive, message: &str) -> Self {
        self.failures.insert(op, message.to_string());
        self
    }

    /// Paths passed to `op`, in call order
    pub(crate) fn calls_to(&self, op: Primitive) -> Vec<PathBuf> {
        self.calls
            .lock()
            .iter()
            .filter(|(called, _)| *called == op)
            .map(|(_, path)| path.clone())
            .collect()
    }

    fn enter(&self, op: Primitive, path: &Path) -> io::Result<()> {
        self.calls.lock().push((op, path.to_path_buf()));
        match self.failures.get(&op) {
            Some(message) => Err(io::Error::new(io::ErrorKind::Other, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<F: Filesystem> Filesystem for InjectFs<F> {
    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        self.enter(Primitive::Stat, path)?;
        self.inner.stat(path).await
    }

    async fn lstat(&self, path: &Path) -> io::Result<FileStat> {
        self.enter(Primitive::Stat, path)?;
        self.inner.lstat(path).await
    }

    async fn mkdir(&self, path: &Path, mode: Option<u32>) -> io::Result<()> {
        self.enter(Primitive::Mkdir, path)?;
        self.inner.mkdir(path, mode).await
    }

    async fn rmdir(&self, path: &Path) -> io::Result<()> {
        self.enter(Primitive::Rmdir, path)?;
        self.inner.rmdir(path).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        self.enter(Primitive::ReadDir, path)?;
        self.inner.read_dir(path).await
    }

    async fn unlink(&self, path: &Path) -> io::Result<()> {
        self.enter(Primitive::Unlink, path)?;
        self.inner.unlink(path).await
    }

    async fn open_read(&self, path: &Path) -> io::Result<ReadStream> {
        self.enter(Primitive::OpenRead, path)?;
        self.inner.open_read(path).await
    }

    async fn open_write(&self, path: &Path) -> io::Result<WriteStream> {
        self.enter(Primitive::OpenWrite, path)?;
        self.inner.open_write(path).await
    }
}

/// Test backend whose directory listings include a name that was removed
/// before it could be stat'ed
pub(crate) struct VanishingFs<F> {
    inner: F,
    name: OsString,
}

impl<F: Filesystem> VanishingFs<F> {
    pub(crate) fn new(inner: F, name: &str) -> Self {
        Self {
            inner,
            name: OsString::from(name),
        }
    }
}

#[async_trait]
impl<F: Filesystem> Filesystem for VanishingFs<F> {
    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        self.inner.stat(path).await
    }

    async fn lstat(&self, path: &Path) -> io::Result<FileStat> {
        self.inner.lstat(path).await
    }

    async fn mkdir(&self, path: &Path, mode: Option<u32>) -> io::Result<()> {
        self.inner.mkdir(path, mode).await
    }

    async fn rmdir(&self, path: &Path) -> io::Result<()> {
        self.inner.rmdir(path).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut names = self.inner.read_dir(path).await?;
        names.push(self.name.clone());
        Ok(names)
    }

    async fn unlink(&self, path: &Path) -> io::Result<()> {
        self.inner.unlink(path).await
    }

    async fn open_read(&self, path: &Path) -> io::Result<ReadStream> {
        self.inner.open_read(path).await
    }

    async fn open_write(&self, path: &Path) -> io::Result<WriteStream> {
        self.inner.open_write(path).await
    }
}
