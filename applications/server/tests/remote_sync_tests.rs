/// Sync runs against a live peer on a local port
mod common;

use common::{fixtures, make_dir, snapshot, write_file, TestPeer};
use mirra_client::{ClientConfig, ClientError, PeerClient, RemoteFileSystem};
use mirra_core::{AbsolutePath, FileSystem, RelativePath, SyncPath};
use mirra_fs::LocalFileSystem;
use mirra_sync::{AutoApprove, ExceptionMode, SyncOutcome, Syncer, SyncerConfig};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

async fn remote(url: &str, token: String) -> Arc<dyn FileSystem> {
    let client = PeerClient::new(ClientConfig::with_token(url, token)).unwrap();
    Arc::new(RemoteFileSystem::connect(client).await.unwrap())
}

fn local_path(path: &Path) -> SyncPath {
    SyncPath::from(AbsolutePath::new(path).unwrap())
}

fn remote_path(path: &str) -> SyncPath {
    SyncPath::from(RelativePath::new(path).unwrap())
}

fn syncer(
    config: SyncerConfig,
    source: Arc<dyn FileSystem>,
    destination: Arc<dyn FileSystem>,
) -> Syncer {
    Syncer::new(config.skip_confirmation(true), source, destination)
        .unwrap()
        .with_prompter(AutoApprove)
}

fn sample_tree(root: &Path) {
    write_file(root, "docs/report.md", "# Report");
    write_file(root, "docs/2024/q1.csv", "a,b\n1,2\n");
    make_dir(root, "empty");
    write_file(root, "top.txt", "top");
}

#[tokio::test]
async fn test_local_to_remote() {
    let peer = TestPeer::new().await;
    let url = peer.spawn().await;
    let local = TempDir::new().unwrap();
    sample_tree(local.path());

    let destination = remote(&url, peer.token(fixtures::ALICE)).await;
    let config = SyncerConfig::new(local_path(local.path()), remote_path("backup"));
    let mut syncer = syncer(config, Arc::new(LocalFileSystem::new()), destination);

    let summary = syncer.start_sync().await.unwrap();
    assert_eq!(summary.outcome, SyncOutcome::Applied);
    assert_eq!(
        snapshot(&peer.user_path(fixtures::ALICE, "backup")),
        snapshot(local.path())
    );

    // Uploads were all moved out of staging
    assert!(snapshot(&peer.temp.path().join("uploads")).is_empty());

    let again = syncer.start_sync().await.unwrap();
    assert_eq!(again.outcome, SyncOutcome::NoDiffs);
}

#[tokio::test]
async fn test_remote_changes_are_updated_and_pruned() {
    let peer = TestPeer::new().await;
    let url = peer.spawn().await;
    let local = TempDir::new().unwrap();
    sample_tree(local.path());

    let backup = peer.user_path(fixtures::ALICE, "backup");
    write_file(&backup, "top.txt", "stale");
    write_file(&backup, "old/gone.txt", "gone");
    write_file(&backup, "docs", "a file where a directory belongs");

    let destination = remote(&url, peer.token(fixtures::ALICE)).await;
    let config = SyncerConfig::new(local_path(local.path()), remote_path("backup"));
    let summary = syncer(config, Arc::new(LocalFileSystem::new()), destination)
        .start_sync()
        .await
        .unwrap();

    assert!(summary.deleted >= 2);
    assert_eq!(snapshot(&backup), snapshot(local.path()));
}

#[tokio::test]
async fn test_remote_to_local() {
    let peer = TestPeer::new().await;
    let url = peer.spawn().await;
    sample_tree(&peer.user_path(fixtures::BOB, "photos"));

    let local = TempDir::new().unwrap();
    let target = local.path().join("photos");
    write_file(&target, "local-only.txt", "x");

    let source = remote(&url, peer.token(fixtures::BOB)).await;
    let config = SyncerConfig::new(remote_path("photos"), local_path(&target));
    syncer(config, source, Arc::new(LocalFileSystem::new()))
        .start_sync()
        .await
        .unwrap();

    assert_eq!(
        snapshot(&target),
        snapshot(&peer.user_path(fixtures::BOB, "photos"))
    );
}

#[tokio::test]
async fn test_remote_to_remote_through_staging() {
    let peer = TestPeer::new().await;
    let url = peer.spawn().await;
    sample_tree(&peer.user_path(fixtures::ALICE, "current"));

    let fs = remote(&url, peer.token(fixtures::ALICE)).await;
    let config = SyncerConfig::new(remote_path("current"), remote_path("archive"));
    syncer(config, Arc::clone(&fs), fs)
        .start_sync()
        .await
        .unwrap();

    assert_eq!(
        snapshot(&peer.user_path(fixtures::ALICE, "archive")),
        snapshot(&peer.user_path(fixtures::ALICE, "current"))
    );
}

#[tokio::test]
async fn test_remote_exceptions_are_peer_relative() {
    let peer = TestPeer::new().await;
    let url = peer.spawn().await;
    let source_root = peer.user_path(fixtures::ALICE, "music");
    write_file(&source_root, "keep/a.flac", "a");
    write_file(&source_root, "skip/b.flac", "b");

    let local = TempDir::new().unwrap();
    let source = remote(&url, peer.token(fixtures::ALICE)).await;
    let config = SyncerConfig::new(remote_path("music"), local_path(local.path()))
        .exceptions(vec![remote_path("music/keep")], ExceptionMode::Allowlist);
    syncer(config, source, Arc::new(LocalFileSystem::new()))
        .start_sync()
        .await
        .unwrap();

    assert!(local.path().join("keep/a.flac").exists());
    assert!(!local.path().join("skip").exists());
}

#[tokio::test]
async fn test_bad_token_fails_before_any_file_operation() {
    let peer = TestPeer::new().await;
    let url = peer.spawn().await;

    let client = PeerClient::new(ClientConfig::with_token(&url, "not-a-token")).unwrap();
    let err = RemoteFileSystem::connect(client).await.unwrap_err();
    assert!(matches!(err, ClientError::AuthFailed(_)));
}
