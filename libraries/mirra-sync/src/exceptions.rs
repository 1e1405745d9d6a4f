/// Exception list and the allow/block policy built on it
use crate::error::{Result, SyncError};
use crate::types::ExceptionMode;
use mirra_core::{RelativePath, SyncPath};

/// Paths excepted from the default behaviour, relative to the source root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionList {
    paths: Vec<RelativePath>,
}

impl ExceptionList {
    /// Every exception must lie under `source_root`.
    pub fn new(source_root: &SyncPath, exceptions: &[SyncPath]) -> Result<Self> {
        let paths = exceptions
            .iter()
            .map(|exception| {
                exception
                    .relative_to(source_root)
                    .ok_or_else(|| SyncError::InvalidException {
                        path: exception.to_string(),
                        root: source_root.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { paths })
    }

    pub fn from_relative(paths: Vec<RelativePath>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[RelativePath] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether `path` is a listed path or lies under one.
    pub fn covers(&self, path: &RelativePath) -> bool {
        self.paths.iter().any(|listed| path.is_sub_path_of(listed))
    }

    /// Whether a listed path lies strictly below `path`.
    pub fn leads_to_listed(&self, path: &RelativePath) -> bool {
        self.paths
            .iter()
            .any(|listed| listed != path && listed.is_sub_path_of(path))
    }
}

/// Decides which source entries take part in a sync.
#[derive(Debug, Clone, Default)]
pub struct ExceptionPolicy {
    list: ExceptionList,
    mode: ExceptionMode,
}

impl ExceptionPolicy {
    pub fn new(list: ExceptionList, mode: ExceptionMode) -> Self {
        Self { list, mode }
    }

    pub fn mode(&self) -> ExceptionMode {
        self.mode
    }

    pub fn list(&self) -> &ExceptionList {
        &self.list
    }

    /// Whether the source entry at `path` may be synced or traversed.
    ///
    /// In allowlist mode a directory on the way to a listed path is allowed
    /// so the scan can reach it; see [`Self::is_traversal_only`].
    pub fn is_allowed(&self, path: &RelativePath, is_dir: bool) -> bool {
        match self.mode {
            ExceptionMode::Blocklist => !self.list.covers(path),
            ExceptionMode::Allowlist => {
                self.list.covers(path) || (is_dir && self.list.leads_to_listed(path))
            }
        }
    }

    /// An allowed directory that is only walked through, never written itself.
    pub fn is_traversal_only(&self, path: &RelativePath) -> bool {
        self.mode == ExceptionMode::Allowlist && !self.list.covers(path)
    }
}
