use mirra_core::{FileSystem, RelativePath, SyncPath};
use std::fmt;
use std::sync::Arc;

/// One side of a sync: a file system and the root on it.
#[derive(Clone)]
pub struct Endpoint {
    pub fs: Arc<dyn FileSystem>,
    pub root: SyncPath,
}

impl Endpoint {
    pub fn new(fs: Arc<dyn FileSystem>, root: SyncPath) -> Self {
        Self { fs, root }
    }

    /// Address of `relative` on this side.
    pub fn path(&self, relative: &RelativePath) -> SyncPath {
        self.root.join(relative)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("location", &self.fs.location())
            .field("root", &self.root)
            .finish()
    }
}
