use super::{PathError, RelativePath};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// An absolute, lexically normalized filesystem path.
///
/// `.` components are dropped and `..` components fold into their parent, so
/// two spellings of the same location compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AbsolutePath(PathBuf);

impl AbsolutePath {
    /// Create an absolute path, failing if `path` is relative.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, PathError> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(PathError::NotAbsolute(path.display().to_string()));
        }
        Ok(Self(normalize(path)))
    }

    /// The path as a standard library path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Consume into a `PathBuf`.
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Append every component of `relative`.
    pub fn join(&self, relative: &RelativePath) -> Self {
        let mut joined = self.0.clone();
        for component in relative.components() {
            joined.push(component);
        }
        Self(joined)
    }

    /// The parent directory, or `None` at the filesystem root.
    pub fn parent(&self) -> Option<Self> {
        self.0.parent().map(|parent| Self(parent.to_path_buf()))
    }

    /// The last component, or `None` at the filesystem root.
    pub fn base_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|name| name.to_str())
    }

    /// The extension of the base name, without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        self.0.extension().and_then(|ext| ext.to_str())
    }

    /// Whether `self` is `root` or lies somewhere below it.
    pub fn is_sub_path_of(&self, root: &AbsolutePath) -> bool {
        self.0.starts_with(&root.0)
    }

    /// The path of `self` relative to `root`, if `self` lies under `root`.
    ///
    /// Returns `None` when `self` is outside `root` or a component is not UTF-8.
    pub fn relative_to(&self, root: &AbsolutePath) -> Option<RelativePath> {
        let stripped = self.0.strip_prefix(&root.0).ok()?;
        let mut relative = RelativePath::root();
        for component in stripped.components() {
            let name = component.as_os_str().to_str()?;
            relative = relative.join_name(name).ok()?;
        }
        Some(relative)
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(name) => normalized.push(name),
        }
    }
    normalized
}

impl fmt::Display for AbsolutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for AbsolutePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl FromStr for AbsolutePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<PathBuf> for AbsolutePath {
    type Error = PathError;

    fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}
