use mirra_core::FsError;
use thiserror::Error;

/// Errors that can occur during sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid root {path}: {reason}")]
    InvalidRoot { path: String, reason: String },

    #[error("Invalid exception {path}: not inside source root {root}")]
    InvalidException { path: String, root: String },

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] FsError),

    #[error("Prompt failed: {0}")]
    Prompt(std::io::Error),

    #[error("Staging error: {0}")]
    Staging(std::io::Error),
}

impl SyncError {
    /// Raised before any file was touched.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidRoot { .. } | Self::InvalidException { .. })
    }

    /// Raised while talking to a remote peer.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::FileSystem(e) if e.is_remote())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
