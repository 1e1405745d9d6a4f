//! Tests for the Mirra peer client.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real peer.

use mirra_client::{ClientConfig, ClientError, PeerClient, RemoteFileSystem};
use mirra_core::protocol::ErrorKind;
use mirra_core::{
    AbsolutePath, FileSystem, FsError, HashAlgorithm, Location, PathType, RelativePath, SyncPath,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "valid_token";

async fn setup_authenticated_client() -> (MockServer, PeerClient) {
    let mock_server = MockServer::start().await;
    let client = PeerClient::new(ClientConfig::with_token(mock_server.uri(), TOKEN)).unwrap();
    (mock_server, client)
}

async fn mount_handshake(mock_server: &MockServer, version: u32, compatible: &[u32]) {
    Mock::given(method("GET"))
        .and(path("/api/sync/v1/handshake"))
        .and(header("Authorization", "Bearer valid_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": version,
            "compatible_previous_client_versions": compatible,
        })))
        .mount(mock_server)
        .await;
}

fn remote(path: &str) -> SyncPath {
    SyncPath::from(RelativePath::new(path).unwrap())
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_http_url() {
        let client = PeerClient::new(ClientConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(client.url(), "http://localhost:8080");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_empty_url_rejected() {
        match PeerClient::new(ClientConfig::new("")).unwrap_err() {
            ClientError::InvalidUrl(msg) => assert!(msg.contains("empty")),
            e => panic!("Expected InvalidUrl error, got: {:?}", e),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        assert!(matches!(
            PeerClient::new(ClientConfig::new("192.168.1.2:8080")),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_sub_clients_require_token() {
        let client = PeerClient::new(ClientConfig::new("http://localhost:8080")).unwrap();
        assert!(matches!(client.path(), Err(ClientError::AuthRequired)));
        assert!(matches!(client.upload(), Err(ClientError::AuthRequired)));
        assert!(matches!(client.download(), Err(ClientError::AuthRequired)));
    }
}

// =============================================================================
// Handshake Tests
// =============================================================================

mod handshake {
    use super::*;

    #[tokio::test]
    async fn test_compatible_peer_connects() {
        let (mock_server, client) = setup_authenticated_client().await;
        mount_handshake(&mock_server, 1, &[]).await;

        let fs = RemoteFileSystem::connect(client).await.unwrap();
        assert_eq!(fs.protocol().version, 1);
        assert_eq!(fs.location(), Location::Remote);
    }

    #[tokio::test]
    async fn test_newer_peer_accepting_old_client_connects() {
        let (mock_server, client) = setup_authenticated_client().await;
        mount_handshake(&mock_server, 2, &[1]).await;

        assert!(RemoteFileSystem::connect(client).await.is_ok());
    }

    #[tokio::test]
    async fn test_incompatible_peer_rejected() {
        let (mock_server, client) = setup_authenticated_client().await;
        mount_handshake(&mock_server, 3, &[2]).await;

        match RemoteFileSystem::connect(client).await.unwrap_err() {
            ClientError::IncompatibleVersion {
                server_version,
                client_version,
            } => {
                assert_eq!(server_version, 3);
                assert_eq!(client_version, 1);
            }
            e => panic!("Expected IncompatibleVersion, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_rejected_token() {
        let (mock_server, client) = setup_authenticated_client().await;

        Mock::given(method("GET"))
            .and(path("/api/sync/v1/handshake"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "Invalid token",
                "kind": "unauthorized",
            })))
            .mount(&mock_server)
            .await;

        match RemoteFileSystem::connect(client).await.unwrap_err() {
            ClientError::AuthFailed(msg) => assert_eq!(msg, "Invalid token"),
            e => panic!("Expected AuthFailed, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_unreachable_peer() {
        let client =
            PeerClient::new(ClientConfig::with_token("http://127.0.0.1:1", TOKEN)).unwrap();

        match client.check_compatibility().await.unwrap_err() {
            ClientError::ServerUnreachable(_) | ClientError::Request(_) => {}
            e => panic!("Expected ServerUnreachable or Request error, got: {:?}", e),
        }
    }
}

// =============================================================================
// Path Operation Tests
// =============================================================================

mod path_operations {
    use super::*;

    async fn connected() -> (MockServer, RemoteFileSystem) {
        let (mock_server, client) = setup_authenticated_client().await;
        mount_handshake(&mock_server, 1, &[]).await;
        let fs = RemoteFileSystem::connect(client).await.unwrap();
        (mock_server, fs)
    }

    #[tokio::test]
    async fn test_path_type() {
        let (mock_server, fs) = connected().await;

        Mock::given(method("GET"))
            .and(path("/api/path/v1/path-type"))
            .and(query_param("path", "docs/a.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_json("FILE"))
            .mount(&mock_server)
            .await;

        assert_eq!(
            fs.resolve_type(&remote("docs/a.txt")).await.unwrap(),
            PathType::File
        );
    }

    #[tokio::test]
    async fn test_read_directory_null_means_not_a_directory() {
        let (mock_server, fs) = connected().await;

        Mock::given(method("GET"))
            .and(path("/api/path/v1/directory/read"))
            .and(query_param("path", "docs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["b", "a"])))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/path/v1/directory/read"))
            .and(query_param("path", "file"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Null))
            .mount(&mock_server)
            .await;

        assert_eq!(
            fs.read_directory(&remote("docs")).await.unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(fs.read_directory(&remote("file")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_hash_sends_algorithm() {
        let (mock_server, fs) = connected().await;

        Mock::given(method("GET"))
            .and(path("/api/path/v1/file/hash"))
            .and(query_param("path", "a.bin"))
            .and(query_param("hash_type", "sha256"))
            .respond_with(ResponseTemplate::new(200).set_body_json("abc123"))
            .mount(&mock_server)
            .await;

        assert_eq!(
            fs.hash_file(&remote("a.bin"), HashAlgorithm::Sha256)
                .await
                .unwrap()
                .as_deref(),
            Some("abc123")
        );
    }

    #[tokio::test]
    async fn test_create_directory_posts_json() {
        let (mock_server, fs) = connected().await;

        Mock::given(method("POST"))
            .and(path("/api/path/v1/directory"))
            .and(body_json(serde_json::json!({ "path": "new/dir" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        fs.create_directory(&remote("new/dir")).await.unwrap();
    }

    #[tokio::test]
    async fn test_peer_errors_map_to_fs_errors() {
        let (mock_server, fs) = connected().await;

        Mock::given(method("DELETE"))
            .and(path("/api/path/v1/file"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": "Wrong path type for remote:docs: expected FILE, found DIR",
                "kind": "wrong_type",
                "path": "remote:docs",
                "expected": "FILE",
                "actual": "DIR",
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/path/v1/directory"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": "Path not found: remote:gone",
                "kind": "not_found",
                "path": "remote:gone",
            })))
            .mount(&mock_server)
            .await;

        match fs.delete_file(&remote("docs")).await.unwrap_err() {
            FsError::WrongType {
                path,
                expected,
                actual,
            } => {
                assert_eq!(path, "remote:docs");
                assert_eq!(expected, PathType::File);
                assert_eq!(actual, PathType::Dir);
            }
            e => panic!("Expected WrongType, got: {:?}", e),
        }

        let missing = fs.delete_directory(&remote("gone")).await.unwrap_err();
        assert!(missing.is_not_found());
        assert_eq!(missing.to_string(), "Path not found: remote:gone");
    }

    #[tokio::test]
    async fn test_unstructured_error_keeps_status() {
        let (mock_server, client) = setup_authenticated_client().await;

        Mock::given(method("GET"))
            .and(path("/api/path/v1/exists"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let error = client
            .path()
            .unwrap()
            .exists(&RelativePath::new("a").unwrap())
            .await
            .unwrap_err();
        assert!(error.kind().is_none());
        match error {
            ClientError::ServerError {
                status, message, ..
            } => {
                assert_eq!(status, 502);
                assert!(message.contains("Bad Gateway"));
            }
            e => panic!("Expected ServerError, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_absolute_paths_never_reach_the_peer() {
        let (_mock_server, fs) = connected().await;

        let absolute = SyncPath::from(AbsolutePath::new(std::env::temp_dir()).unwrap());
        assert!(matches!(
            fs.exists(&absolute).await.unwrap_err(),
            FsError::InvalidPath(_)
        ));
    }

    #[tokio::test]
    async fn test_move_is_unsupported() {
        let (_mock_server, fs) = connected().await;
        assert!(matches!(
            fs.move_file(&remote("a"), &remote("b")).await.unwrap_err(),
            FsError::Unsupported(_)
        ));
    }

    #[tokio::test]
    async fn test_error_kind_is_exposed() {
        let (mock_server, client) = setup_authenticated_client().await;

        Mock::given(method("POST"))
            .and(path("/api/path/v1/directory"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": "Path already exists: remote:a",
                "kind": "already_exists",
                "path": "remote:a",
            })))
            .mount(&mock_server)
            .await;

        let error = client
            .path()
            .unwrap()
            .create_directory(&RelativePath::new("a").unwrap())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), Some(ErrorKind::AlreadyExists));
    }
}

// =============================================================================
// Transfer Tests
// =============================================================================

mod transfer {
    use super::*;

    #[tokio::test]
    async fn test_copy_uploads_then_moves() {
        let (mock_server, client) = setup_authenticated_client().await;
        mount_handshake(&mock_server, 1, &[]).await;

        Mock::given(method("POST"))
            .and(path("/api/path/v1/file/upload"))
            .and(header("Authorization", "Bearer valid_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uploaded_file_id": "8f1c6d2e-0000-4000-8000-000000000001",
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/path/v1/file/move-uploaded"))
            .and(body_json(serde_json::json!({
                "uploaded_file_id": "8f1c6d2e-0000-4000-8000-000000000001",
                "destination_path": "inbox/report.pdf",
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let local = temp.path().join("report.pdf");
        std::fs::write(&local, b"%PDF-1.7 fake").unwrap();

        let fs = RemoteFileSystem::connect(client).await.unwrap();
        fs.copy_file(
            &SyncPath::from(AbsolutePath::new(&local).unwrap()),
            &remote("inbox/report.pdf"),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_copy_missing_local_source() {
        let (mock_server, client) = setup_authenticated_client().await;
        mount_handshake(&mock_server, 1, &[]).await;
        let fs = RemoteFileSystem::connect(client).await.unwrap();

        let temp = tempfile::tempdir().unwrap();
        let missing = SyncPath::from(AbsolutePath::new(temp.path().join("nope")).unwrap());

        let error = fs.copy_file(&missing, &remote("x")).await.unwrap_err();
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn test_download_streams_to_file() {
        let (mock_server, client) = setup_authenticated_client().await;
        mount_handshake(&mock_server, 1, &[]).await;

        Mock::given(method("GET"))
            .and(path("/api/path/v1/file/download"))
            .and(query_param("path", "music/song.flac"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"flac bytes".to_vec()))
            .mount(&mock_server)
            .await;

        let fs = RemoteFileSystem::connect(client).await.unwrap();
        let temp = tempfile::tempdir().unwrap();
        let target = AbsolutePath::new(temp.path().join("staging/song.flac")).unwrap();

        fs.download_file(&remote("music/song.flac"), &target)
            .await
            .unwrap();
        assert_eq!(std::fs::read(target.as_path()).unwrap(), b"flac bytes");
    }
}
