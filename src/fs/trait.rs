//! FileSystem trait definition

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Type of file system entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
}

/// Read-only view of a source tree.
///
/// Detectors only ever see the tree through this trait, which keeps them free
/// of writes and lets unit tests run against an in-memory tree.
pub trait FileSystem: Send + Sync {
    /// Check if a path exists. A missing path is `Ok(false)`; any other
    /// failure to stat the path is an error.
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Read raw file contents, for scans that must tolerate any encoding
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    /// Recursively list regular files below `root`, sorted by path.
    ///
    /// Hidden files are included and ignore files are not honoured. A missing
    /// `root` yields an empty list.
    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Join paths
    fn join(&self, base: &Path, path: &str) -> PathBuf {
        base.join(path)
    }
}
