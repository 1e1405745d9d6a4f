/// Common test utilities and fixtures
use axum::Router;
use mirra_server::{create_router, AppState, AuthService, PeerStorage};
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

pub const TEST_SECRET: &str = "test-secret-key";

/// Test user ids
pub mod fixtures {
    pub const ALICE: &str = "alice";
    pub const BOB: &str = "bob";
}

/// A peer backed by a temp dir, not yet listening.
pub struct TestPeer {
    pub temp: TempDir,
    pub storage: Arc<PeerStorage>,
    pub auth_service: Arc<AuthService>,
}

impl TestPeer {
    pub async fn new() -> Self {
        init_tracing();
        let temp = TempDir::new().unwrap();
        let storage = PeerStorage::new(&temp.path().join("users"), &temp.path().join("uploads"))
            .unwrap();
        storage.initialize().await.unwrap();

        Self {
            temp,
            storage: Arc::new(storage),
            auth_service: Arc::new(AuthService::new(TEST_SECRET.to_string(), 1)),
        }
    }

    pub fn router(&self) -> Router {
        create_router(AppState::new(
            Arc::clone(&self.auth_service),
            Arc::clone(&self.storage),
        ))
    }

    pub fn token(&self, user_id: &str) -> String {
        self.auth_service.create_access_token(user_id).unwrap()
    }

    /// On-disk location of `relative` in a user's tree.
    pub fn user_path(&self, user_id: &str, relative: &str) -> PathBuf {
        let root = self.storage.user_root(user_id).unwrap().into_path_buf();
        if relative.is_empty() {
            root
        } else {
            root.join(relative)
        }
    }

    /// Serve on an ephemeral local port and return the base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = self.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
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

/// Files and directories under `root`; `None` marks a directory.
pub fn snapshot(root: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
    fn walk(root: &Path, dir: &Path, entries: &mut BTreeMap<String, Option<Vec<u8>>>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let key = path
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            if path.is_dir() {
                entries.insert(key, None);
                walk(root, &path, entries);
            } else {
                entries.insert(key, Some(std::fs::read(&path).unwrap()));
            }
        }
    }

    let mut entries = BTreeMap::new();
    if root.exists() {
        walk(root, root, &mut entries);
    }
    entries
}
