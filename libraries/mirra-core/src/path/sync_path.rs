use super::{AbsolutePath, RelativePath};
use std::fmt;

/// A path handed to a [`FileSystem`](crate::FileSystem).
///
/// Local file systems address entries by absolute path, remote peers by a path
/// relative to the authenticated user's root on the peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyncPath {
    Absolute(AbsolutePath),
    Relative(RelativePath),
}

impl SyncPath {
    /// Append a relative path, keeping the variant.
    pub fn join(&self, relative: &RelativePath) -> Self {
        match self {
            Self::Absolute(path) => Self::Absolute(path.join(relative)),
            Self::Relative(path) => Self::Relative(path.join(relative)),
        }
    }

    /// The path of `self` relative to `root`.
    ///
    /// Mixing variants never matches.
    pub fn relative_to(&self, root: &SyncPath) -> Option<RelativePath> {
        match (self, root) {
            (Self::Absolute(path), Self::Absolute(root)) => path.relative_to(root),
            (Self::Relative(path), Self::Relative(root)) => path.relative_to(root),
            _ => None,
        }
    }

    pub fn is_sub_path_of(&self, root: &SyncPath) -> bool {
        self.relative_to(root).is_some()
    }

    pub fn parent(&self) -> Option<Self> {
        match self {
            Self::Absolute(path) => path.parent().map(Self::Absolute),
            Self::Relative(path) => path.parent().map(Self::Relative),
        }
    }

    pub fn base_name(&self) -> Option<&str> {
        match self {
            Self::Absolute(path) => path.base_name(),
            Self::Relative(path) => path.base_name(),
        }
    }

    pub fn as_absolute(&self) -> Option<&AbsolutePath> {
        match self {
            Self::Absolute(path) => Some(path),
            Self::Relative(_) => None,
        }
    }

    pub fn as_relative(&self) -> Option<&RelativePath> {
        match self {
            Self::Relative(path) => Some(path),
            Self::Absolute(_) => None,
        }
    }
}

impl From<AbsolutePath> for SyncPath {
    fn from(path: AbsolutePath) -> Self {
        Self::Absolute(path)
    }
}

impl From<RelativePath> for SyncPath {
    fn from(path: RelativePath) -> Self {
        Self::Relative(path)
    }
}

impl fmt::Display for SyncPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(path) => write!(f, "{path}"),
            Self::Relative(path) => write!(f, "remote:{path}"),
        }
    }
}
