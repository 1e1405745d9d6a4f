//! The file system capability the sync engine is written against.

use crate::error::Result;
use crate::hash::HashAlgorithm;
use crate::path::{AbsolutePath, PathType, ResolvedPath, SyncPath};
use async_trait::async_trait;

/// Where a file system's bytes live relative to this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Local,
    Remote,
}

/// Operations the engine performs on one side of a sync.
///
/// Implementations must raise the same [`FsError`](crate::FsError) variant for
/// the same condition, whether the entry lives on local disk or on a peer.
#[async_trait]
pub trait FileSystem: Send + Sync {
    fn location(&self) -> Location;

    /// Whether anything occupies `path`. A dangling symlink counts.
    async fn exists(&self, path: &SyncPath) -> Result<bool>;

    async fn resolve_type(&self, path: &SyncPath) -> Result<PathType>;

    async fn resolve(&self, path: &SyncPath) -> Result<ResolvedPath> {
        let path_type = self.resolve_type(path).await?;
        Ok(ResolvedPath::new(path.clone(), path_type))
    }

    /// Lowercase hex digest, or `None` unless `path` is a regular file.
    async fn hash_file(&self, path: &SyncPath, algorithm: HashAlgorithm)
        -> Result<Option<String>>;

    /// Entry names sorted by name.
    ///
    /// `Some([])` when nothing exists at `path`, `None` when something other
    /// than a directory does.
    async fn read_directory(&self, path: &SyncPath) -> Result<Option<Vec<String>>>;

    /// Create `path` and any missing parents.
    async fn create_directory(&self, path: &SyncPath) -> Result<()>;

    /// Remove a non-directory entry.
    async fn delete_file(&self, path: &SyncPath) -> Result<()>;

    /// Remove a directory and everything under it.
    async fn delete_directory(&self, path: &SyncPath) -> Result<()>;

    /// Remove whatever occupies `path`. Does nothing if the path is empty.
    async fn delete(&self, path: &SyncPath) -> Result<()> {
        match self.resolve_type(path).await? {
            PathType::Null => Ok(()),
            PathType::Dir => self.delete_directory(path).await,
            _ => self.delete_file(path).await,
        }
    }

    /// Copy a file into place, replacing any existing entry at `to`.
    async fn copy_file(&self, from: &SyncPath, to: &SyncPath) -> Result<()>;

    /// Move a file into place, replacing any existing entry at `to`.
    async fn move_file(&self, from: &SyncPath, to: &SyncPath) -> Result<()>;

    /// Write the bytes of `from` on this file system into a local file.
    async fn download_file(&self, from: &SyncPath, to: &AbsolutePath) -> Result<()>;
}
