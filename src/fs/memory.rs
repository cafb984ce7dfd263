//! An in-memory filesystem.
//!
//! [`MemFs`] keeps a tree of directories and files behind a single lock and
//! mirrors the error kinds a Unix system reports for the same calls. Directory
//! entries are enumerated in insertion order, which keeps listings
//! deterministic in tests.
//!
//! Cloning a `MemFs` yields another handle to the same tree.

use crate::fs::{FileKind, FileStat, Filesystem, ReadStream, WriteStream};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::ffi::OsString;
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

/// Mode given to directories created without an explicit one
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Mode given to newly created files
pub const DEFAULT_FILE_MODE: u32 = 0o644;

#[derive(Debug)]
enum Node {
    Dir {
        mode: u32,
        entries: IndexMap<OsString, Node>,
    },
    File {
        mode: u32,
        data: Vec<u8>,
    },
}

impl Node {
    fn empty_dir(mode: u32) -> Self {
        Node::Dir {
            mode,
            entries: IndexMap::new(),
        }
    }

    fn stat(&self) -> FileStat {
        match self {
            Node::Dir { mode, .. } => FileStat {
                kind: FileKind::Directory,
                len: 0,
                mode: Some(*mode),
            },
            Node::File { mode, data } => FileStat {
                kind: FileKind::File,
                len: data.len() as u64,
                mode: Some(*mode),
            },
        }
    }
}

fn fs_error(kind: ErrorKind, path: &Path) -> io::Error {
    io::Error::new(kind, format!("{}: {}", kind, path.display()))
}

// Split a path into normal components. `..` pops, `.` and the root are
// ignored, so relative paths resolve from the root of the tree.
fn parts_of(path: &Path) -> io::Result<Vec<OsString>> {
    if path.as_os_str().is_empty() {
        return Err(fs_error(ErrorKind::NotFound, path));
    }

    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                parts.pop();
            }
            Component::Normal(name) => parts.push(name.to_os_string()),
        }
    }
    Ok(parts)
}

fn lookup<'a>(root: &'a Node, parts: &[OsString], path: &Path) -> io::Result<&'a Node> {
    let mut node = root;
    for part in parts {
        node = match node {
            Node::Dir { entries, .. } => entries
                .get(part)
                .ok_or_else(|| fs_error(ErrorKind::NotFound, path))?,
            Node::File { .. } => return Err(fs_error(ErrorKind::NotADirectory, path)),
        };
    }
    Ok(node)
}

fn lookup_mut<'a>(root: &'a mut Node, parts: &[OsString], path: &Path) -> io::Result<&'a mut Node> {
    let mut node = root;
    for part in parts {
        node = match node {
            Node::Dir { entries, .. } => entries
                .get_mut(part)
                .ok_or_else(|| fs_error(ErrorKind::NotFound, path))?,
            Node::File { .. } => return Err(fs_error(ErrorKind::NotADirectory, path)),
        };
    }
    Ok(node)
}

// Entries of the directory that holds `parts`' last component.
fn parent_entries<'a>(
    root: &'a mut Node,
    parts: &[OsString],
    path: &Path,
) -> io::Result<&'a mut IndexMap<OsString, Node>> {
    let parent = &parts[..parts.len().saturating_sub(1)];
    match lookup_mut(root, parent, path)? {
        Node::Dir { entries, .. } => Ok(entries),
        Node::File { .. } => Err(fs_error(ErrorKind::NotADirectory, path)),
    }
}

/// In-memory filesystem
#[derive(Debug, Clone)]
pub struct MemFs {
    root: Arc<RwLock<Node>>,
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemFs {
    /// Create an empty filesystem holding only the root directory
    pub fn new() -> Self {
        Self {
            root: Arc::new(RwLock::new(Node::empty_dir(DEFAULT_DIR_MODE))),
        }
    }

    /// Create a directory and any missing ancestors
    pub fn create_dir_all(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let parts = parts_of(path)?;
        let mut root = self.root.write();

        let mut node = &mut *root;
        for part in &parts {
            node = match node {
                Node::Dir { entries, .. } => entries
                    .entry(part.clone())
                    .or_insert_with(|| Node::empty_dir(DEFAULT_DIR_MODE)),
                Node::File { .. } => return Err(fs_error(ErrorKind::NotADirectory, path)),
            };
        }

        match node {
            Node::Dir { .. } => Ok(()),
            Node::File { .. } => Err(fs_error(ErrorKind::AlreadyExists, path)),
        }
    }

    /// Write a whole file, creating missing ancestors
    pub fn write_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.create_dir_all(parent)?;
        }

        let parts = parts_of(path)?;
        let name = parts
            .last()
            .cloned()
            .ok_or_else(|| fs_error(ErrorKind::IsADirectory, path))?;

        let mut root = self.root.write();
        let entries = parent_entries(&mut root, &parts, path)?;
        match entries.get_mut(&name) {
            Some(Node::Dir { .. }) => Err(fs_error(ErrorKind::IsADirectory, path)),
            Some(Node::File { data, .. }) => {
                *data = contents.as_ref().to_vec();
                Ok(())
            }
            None => {
                entries.insert(
                    name,
                    Node::File {
                        mode: DEFAULT_FILE_MODE,
                        data: contents.as_ref().to_vec(),
                    },
                );
                Ok(())
            }
        }
    }

    /// Read a whole file
    pub fn read_file(&self, path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
        let path = path.as_ref();
        let parts = parts_of(path)?;
        let root = self.root.read();
        match lookup(&root, &parts, path)? {
            Node::File { data, .. } => Ok(data.clone()),
            Node::Dir { .. } => Err(fs_error(ErrorKind::IsADirectory, path)),
        }
    }

    /// Check whether anything exists at `path`
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match parts_of(path) {
            Ok(parts) => lookup(&self.root.read(), &parts, path).is_ok(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl Filesystem for MemFs {
    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let parts = parts_of(path)?;
        let root = self.root.read();
        Ok(lookup(&root, &parts, path)?.stat())
    }

    async fn mkdir(&self, path: &Path, mode: Option<u32>) -> io::Result<()> {
        let parts = parts_of(path)?;
        let name = match parts.last() {
            Some(name) => name.clone(),
            None => return Err(fs_error(ErrorKind::AlreadyExists, path)),
        };

        let mut root = self.root.write();
        let entries = parent_entries(&mut root, &parts, path)?;
        if entries.contains_key(&name) {
            return Err(fs_error(ErrorKind::AlreadyExists, path));
        }
        entries.insert(name, Node::empty_dir(mode.unwrap_or(DEFAULT_DIR_MODE)));
        Ok(())
    }

    async fn rmdir(&self, path: &Path) -> io::Result<()> {
        let parts = parts_of(path)?;
        let name = match parts.last() {
            Some(name) => name.clone(),
            None => return Err(fs_error(ErrorKind::PermissionDenied, path)),
        };

        let mut root = self.root.write();
        let entries = parent_entries(&mut root, &parts, path)?;
        match entries.get(&name) {
            None => return Err(fs_error(ErrorKind::NotFound, path)),
            Some(Node::File { .. }) => return Err(fs_error(ErrorKind::NotADirectory, path)),
            Some(Node::Dir { entries: children, .. }) if !children.is_empty() => {
                return Err(fs_error(ErrorKind::DirectoryNotEmpty, path));
            }
            Some(Node::Dir { .. }) => {}
        }
        entries.shift_remove(&name);
        Ok(())
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let parts = parts_of(path)?;
        let root = self.root.read();
        match lookup(&root, &parts, path)? {
            Node::Dir { entries, .. } => Ok(entries.keys().cloned().collect()),
            Node::File { .. } => Err(fs_error(ErrorKind::NotADirectory, path)),
        }
    }

    async fn unlink(&self, path: &Path) -> io::Result<()> {
        let parts = parts_of(path)?;
        let name = match parts.last() {
            Some(name) => name.clone(),
            None => return Err(fs_error(ErrorKind::IsADirectory, path)),
        };

        let mut root = self.root.write();
        let entries = parent_entries(&mut root, &parts, path)?;
        match entries.get(&name) {
            None => Err(fs_error(ErrorKind::NotFound, path)),
            Some(Node::Dir { .. }) => Err(fs_error(ErrorKind::IsADirectory, path)),
            Some(Node::File { .. }) => {
                entries.shift_remove(&name);
                Ok(())
            }
        }
    }

    async fn open_read(&self, path: &Path) -> io::Result<ReadStream> {
        let data = self.read_file(path)?;
        Ok(Box::new(io::Cursor::new(data)))
    }

    async fn open_write(&self, path: &Path) -> io::Result<WriteStream> {
        let parts = parts_of(path)?;
        let name = match parts.last() {
            Some(name) => name.clone(),
            None => return Err(fs_error(ErrorKind::IsADirectory, path)),
        };

        {
            let mut root = self.root.write();
            let entries = parent_entries(&mut root, &parts, path)?;
            match entries.get_mut(&name) {
                Some(Node::Dir { .. }) => return Err(fs_error(ErrorKind::IsADirectory, path)),
                Some(Node::File { data, .. }) => data.clear(),
                None => {
                    entries.insert(
                        name,
                        Node::File {
                            mode: DEFAULT_FILE_MODE,
                            data: Vec::new(),
                        },
                    );
                }
            }
        }

        Ok(Box::new(MemWriter {
            root: Arc::clone(&self.root),
            parts,
            path: path.to_path_buf(),
        }))
    }
}

// Appends straight into the file node; removing the file while the writer
// is open turns later writes into NotFound errors.
struct MemWriter {
    root: Arc<RwLock<Node>>,
    parts: Vec<OsString>,
    path: PathBuf,
}

impl AsyncWrite for MemWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut root = self.root.write();
        let result = match lookup_mut(&mut root, &self.parts, &self.path) {
            Ok(Node::File { data, .. }) => {
                data.extend_from_slice(buf);
                Ok(buf.len())
            }
            Ok(Node::Dir { .. }) => Err(fs_error(ErrorKind::IsADirectory, &self.path)),
            Err(e) => Err(e),
        };
        Poll::Ready(result)
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
