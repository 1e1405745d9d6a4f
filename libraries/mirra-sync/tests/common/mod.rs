/// Common test utilities and fixtures
use mirra_core::{AbsolutePath, FileSystem, SyncPath};
use mirra_fs::LocalFileSystem;
use mirra_sync::{AutoApprove, ExceptionMode, Syncer, SyncerConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use tempfile::TempDir;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// What a snapshot records for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Dir,
    File(Vec<u8>),
}

/// A source and a destination directory inside one temp dir.
pub struct Trees {
    _temp: TempDir,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Trees {
    pub fn new() -> Self {
        init_tracing();
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let destination = temp.path().join("destination");
        std::fs::create_dir(&source).unwrap();
        std::fs::create_dir(&destination).unwrap();
        Self {
            _temp: temp,
            source,
            destination,
        }
    }

    pub fn source_root(&self) -> SyncPath {
        local(&self.source)
    }

    pub fn destination_root(&self) -> SyncPath {
        local(&self.destination)
    }

    pub fn config(&self) -> SyncerConfig {
        SyncerConfig::new(self.source_root(), self.destination_root()).skip_confirmation(true)
    }

    /// Local-to-local syncer that never prompts.
    pub fn syncer(&self) -> Syncer {
        syncer_with(self.config())
    }

    pub fn syncer_with_exceptions(&self, exceptions: &[&str], mode: ExceptionMode) -> Syncer {
        let exceptions = exceptions
            .iter()
            .map(|relative| local(&self.source.join(relative)))
            .collect();
        syncer_with(self.config().exceptions(exceptions, mode))
    }
}

pub fn local(path: &Path) -> SyncPath {
    SyncPath::from(AbsolutePath::new(path).unwrap())
}

pub fn syncer_with(config: SyncerConfig) -> Syncer {
    let fs: Arc<dyn FileSystem> = Arc::new(LocalFileSystem::new());
    Syncer::new(config, fs.clone(), fs)
        .unwrap()
        .with_prompter(AutoApprove)
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

pub fn make_dir(root: &Path, relative: &str) {
    std::fs::create_dir_all(root.join(relative)).unwrap();
}

/// Every entry under `root`, keyed by `/`-separated relative path.
pub fn snapshot(root: &Path) -> BTreeMap<String, Entry> {
    fn walk(root: &Path, dir: &Path, entries: &mut BTreeMap<String, Entry>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();
            let key = path
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            let file_type = entry.file_type().unwrap();
            if file_type.is_dir() {
                entries.insert(key, Entry::Dir);
                walk(root, &path, entries);
            } else if file_type.is_file() {
                entries.insert(key, Entry::File(std::fs::read(&path).unwrap()));
            }
        }
    }

    let mut entries = BTreeMap::new();
    if root.exists() {
        walk(root, root, &mut entries);
    }
    entries
}

/// Sorted string form of a diff batch.
pub fn names(batch: &[mirra_core::RelativePath]) -> Vec<String> {
    let mut names: Vec<String> = batch.iter().map(|p| p.as_str().to_string()).collect();
    names.sort();
    names
}
