use crate::path::{PathError, PathType, SyncPath};
use thiserror::Error;

/// Errors raised by [`FileSystem`](crate::FileSystem) implementations.
///
/// Local and remote backends raise the same variant for the same condition so
/// the engine never needs to know which one it is talking to.
#[derive(Error, Debug)]
pub enum FsError {
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Path already exists: {0}")]
    AlreadyExists(String),

    #[error("Wrong path type for {path}: expected {expected}, found {actual}")]
    WrongType {
        path: String,
        expected: PathType,
        actual: PathType,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl FsError {
    pub fn not_found(path: &SyncPath) -> Self {
        Self::NotFound(path.to_string())
    }

    pub fn already_exists(path: &SyncPath) -> Self {
        Self::AlreadyExists(path.to_string())
    }

    pub fn wrong_type(path: &SyncPath, expected: PathType, actual: PathType) -> Self {
        Self::WrongType {
            path: path.to_string(),
            expected,
            actual,
        }
    }

    /// Whether the error came from talking to a remote peer.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Authentication(_) | Self::Transport(_) | Self::Protocol(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
