//! Path value types.
//!
//! Paths are immutable values. Whether a path points at a file, a directory or
//! nothing at all is an external fact: it is looked up through a
//! [`FileSystem`](crate::FileSystem) and returned as a [`PathType`] (or paired
//! with the path in a [`ResolvedPath`]), never cached on the value itself.

mod absolute;
mod path_type;
mod relative;
mod sync_path;

use thiserror::Error;

pub use absolute::AbsolutePath;
pub use path_type::{PathType, ResolvedPath};
pub use relative::RelativePath;
pub use sync_path::SyncPath;

/// Errors raised while constructing path values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// An absolute path was required.
    #[error("Path must be absolute: {0}")]
    NotAbsolute(String),

    /// A relative path was required.
    #[error("Path must be relative: {0}")]
    NotRelative(String),

    /// A relative path climbs above its root with `..`.
    #[error("Path escapes its root: {0}")]
    EscapesRoot(String),

    /// A directory entry name is empty or contains a separator.
    #[error("Invalid entry name: {0:?}")]
    InvalidName(String),

    /// The path cannot be represented as UTF-8.
    #[error("Path is not valid UTF-8: {0}")]
    NotUtf8(String),

    /// A remote peer refused the path.
    #[error("Path rejected by peer: {0}")]
    Rejected(String),
}
