use super::PathError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A path relative to an implicit root, stored with `/` separators.
///
/// Empty and `.` components are dropped, `..` folds into its parent and may
/// never climb above the root. The empty path is the root itself and displays
/// as `.`. Deserialization goes through the same validation, so a relative
/// path received over the wire cannot escape its sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelativePath(String);

impl RelativePath {
    /// Parse and normalize a relative path. Both `/` and `\` separate components.
    pub fn new(path: impl AsRef<str>) -> Result<Self, PathError> {
        let raw = path.as_ref();
        if raw.starts_with('/') || raw.starts_with('\\') || has_drive_prefix(raw) {
            return Err(PathError::NotRelative(raw.to_string()));
        }

        let mut components: Vec<&str> = Vec::new();
        for component in raw.split(['/', '\\']) {
            match component {
                "" | "." => {}
                ".." => {
                    if components.pop().is_none() {
                        return Err(PathError::EscapesRoot(raw.to_string()));
                    }
                }
                name => components.push(name),
            }
        }
        Ok(Self(components.join("/")))
    }

    /// The root itself.
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalized form, `""` for the root.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|component| !component.is_empty())
    }

    /// Append every component of `other`.
    pub fn join(&self, other: &RelativePath) -> Self {
        match (self.is_root(), other.is_root()) {
            (_, true) => self.clone(),
            (true, false) => other.clone(),
            (false, false) => Self(format!("{}/{}", self.0, other.0)),
        }
    }

    /// Append a single directory entry name.
    pub fn join_name(&self, name: &str) -> Result<Self, PathError> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(PathError::InvalidName(name.to_string()));
        }
        if self.is_root() {
            if has_drive_prefix(name) {
                return Err(PathError::InvalidName(name.to_string()));
            }
            Ok(Self(name.to_string()))
        } else {
            Ok(Self(format!("{}/{}", self.0, name)))
        }
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(index) => Some(Self(self.0[..index].to_string())),
            None => Some(Self::root()),
        }
    }

    /// The last component, or `None` for the root.
    pub fn base_name(&self) -> Option<&str> {
        self.components().last()
    }

    /// The extension of the base name, without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.base_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(index) => Some(&name[index + 1..]),
        }
    }

    /// Whether `self` equals `root` or lies below it, component-wise.
    pub fn is_sub_path_of(&self, root: &RelativePath) -> bool {
        if root.is_root() {
            return true;
        }
        self.0 == root.0
            || (self.0.starts_with(&root.0) && self.0.as_bytes().get(root.0.len()) == Some(&b'/'))
    }

    /// The path of `self` relative to `root`, if `self` lies under `root`.
    pub fn relative_to(&self, root: &RelativePath) -> Option<RelativePath> {
        if !self.is_sub_path_of(root) {
            return None;
        }
        if root.is_root() {
            return Some(self.clone());
        }
        let rest = self.0[root.0.len()..].trim_start_matches('/');
        Some(Self(rest.to_string()))
    }
}

/// `C:`, `C:/...` or `C:\...`. A name such as `a:b.txt` is not a drive.
fn has_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && matches!(bytes.get(2), None | Some(b'/' | b'\\'))
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, ".")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for RelativePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RelativePath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.0
    }
}
