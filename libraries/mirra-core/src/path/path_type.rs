use super::SyncPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What occupies a path on a file system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathType {
    File,
    Dir,
    SymlinkFile,
    SymlinkDir,
    /// Sockets, devices, FIFOs and dangling symlinks.
    Other,
    /// Nothing exists at the path.
    Null,
}

impl PathType {
    pub fn exists(self) -> bool {
        self != Self::Null
    }

    pub fn is_file(self) -> bool {
        self == Self::File
    }

    pub fn is_dir(self) -> bool {
        self == Self::Dir
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Dir => "DIR",
            Self::SymlinkFile => "SYMLINK_FILE",
            Self::SymlinkDir => "SYMLINK_DIR",
            Self::Other => "OTHER",
            Self::Null => "NULL",
        }
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path paired with the type it had when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: SyncPath,
    pub path_type: PathType,
}

impl ResolvedPath {
    pub fn new(path: SyncPath, path_type: PathType) -> Self {
        Self { path, path_type }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&PathType::Dir).unwrap(), "\"DIR\"");
        assert_eq!(
            serde_json::to_string(&PathType::SymlinkFile).unwrap(),
            "\"SYMLINK_FILE\""
        );
        let parsed: PathType = serde_json::from_str("\"NULL\"").unwrap();
        assert_eq!(parsed, PathType::Null);
        assert!(!parsed.exists());
        assert_eq!(PathType::SymlinkDir.to_string(), "SYMLINK_DIR");
    }
}
