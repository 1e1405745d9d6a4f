//! Types spoken between the sync client and a peer server.
//!
//! All peer-side paths travel as [`RelativePath`] strings. The peer resolves
//! them under the authenticated user's root.

use crate::error::FsError;
use crate::hash::HashAlgorithm;
use crate::path::{PathError, PathType, RelativePath};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PATH_API_BASE: &str = "/api/path/v1";
pub const SYNC_API_BASE: &str = "/api/sync/v1";
pub const HEALTH_ROUTE: &str = "/api/health";

/// Multipart field carrying an uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Protocol version this build of the client speaks.
pub const CLIENT_PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathQuery {
    pub path: RelativePath,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileHashQuery {
    pub path: RelativePath,
    #[serde(default)]
    pub hash_type: HashAlgorithm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDirectoryRequest {
    pub path: RelativePath,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub uploaded_file_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveUploadedFileRequest {
    pub uploaded_file_id: String,
    pub destination_path: RelativePath,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// One entry of the handshake table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeProtocol {
    pub version: u32,
    pub compatible_previous_client_versions: Vec<u32>,
}

impl HandshakeProtocol {
    /// Whether a client speaking `client_version` may talk to this protocol.
    pub fn accepts_client(&self, client_version: u32) -> bool {
        self.version == client_version
            || self
                .compatible_previous_client_versions
                .contains(&client_version)
    }
}

/// Every protocol version this build knows about, oldest first.
pub fn handshake_protocols() -> Vec<HandshakeProtocol> {
    vec![HandshakeProtocol {
        version: 1,
        compatible_previous_client_versions: vec![],
    }]
}

/// The highest protocol version in [`handshake_protocols`].
pub fn current_handshake_protocol() -> HandshakeProtocol {
    handshake_protocols()
        .into_iter()
        .max_by_key(|protocol| protocol.version)
        .unwrap_or(HandshakeProtocol {
            version: CLIENT_PROTOCOL_VERSION,
            compatible_previous_client_versions: vec![],
        })
}

/// Machine-readable category of a peer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidPath,
    NotFound,
    AlreadyExists,
    WrongType,
    NotADirectory,
    BadRequest,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    /// Category for a file system error raised on the peer.
    pub fn of(error: &FsError) -> Self {
        match error {
            FsError::InvalidPath(_) => Self::InvalidPath,
            FsError::NotFound(_) => Self::NotFound,
            FsError::AlreadyExists(_) => Self::AlreadyExists,
            FsError::WrongType { .. } => Self::WrongType,
            FsError::NotADirectory(_) => Self::NotADirectory,
            FsError::Unsupported(_) => Self::BadRequest,
            FsError::Authentication(_) => Self::Unauthorized,
            FsError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => Self::NotFound,
            FsError::Io(_) | FsError::Transport(_) | FsError::Protocol(_) => Self::Internal,
        }
    }

    pub fn status_code(self) -> u16 {
        match self {
            Self::InvalidPath | Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::AlreadyExists | Self::WrongType | Self::NotADirectory => 409,
            Self::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidPath => "invalid_path",
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::WrongType => "wrong_type",
            Self::NotADirectory => "not_a_directory",
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// JSON body of every error response.
///
/// `path`, `expected` and `actual` are present when the error concerns one
/// entry, so the client can raise exactly the error a local disk would.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<PathType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<PathType>,
}

impl ErrorBody {
    pub fn new(kind: ErrorKind, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind,
            path: None,
            expected: None,
            actual: None,
        }
    }

    /// Rebuild the file system error the peer raised.
    pub fn into_fs_error(self) -> FsError {
        let path = self.path.unwrap_or_else(|| self.error.clone());
        match self.kind {
            ErrorKind::InvalidPath => FsError::InvalidPath(PathError::Rejected(self.error)),
            ErrorKind::NotFound => FsError::NotFound(path),
            ErrorKind::AlreadyExists => FsError::AlreadyExists(path),
            ErrorKind::NotADirectory => FsError::NotADirectory(path),
            ErrorKind::WrongType => match (self.expected, self.actual) {
                (Some(expected), Some(actual)) => FsError::WrongType {
                    path,
                    expected,
                    actual,
                },
                _ => FsError::Protocol(self.error),
            },
            ErrorKind::Unauthorized => FsError::Authentication(self.error),
            ErrorKind::BadRequest | ErrorKind::Internal => FsError::Protocol(self.error),
        }
    }
}

impl From<&FsError> for ErrorBody {
    fn from(error: &FsError) -> Self {
        let mut body = Self::new(ErrorKind::of(error), error.to_string());
        match error {
            FsError::NotFound(path) | FsError::AlreadyExists(path) | FsError::NotADirectory(path) => {
                body.path = Some(path.clone());
            }
            FsError::WrongType {
                path,
                expected,
                actual,
            } => {
                body.path = Some(path.clone());
                body.expected = Some(*expected);
                body.actual = Some(*actual);
            }
            _ => {}
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::SyncPath;

    #[test]
    fn test_handshake_compatibility() {
        let current = current_handshake_protocol();
        assert_eq!(current.version, 1);
        assert!(current.accepts_client(CLIENT_PROTOCOL_VERSION));
        assert!(!current.accepts_client(2));

        let newer = HandshakeProtocol {
            version: 3,
            compatible_previous_client_versions: vec![2],
        };
        assert!(newer.accepts_client(2));
        assert!(newer.accepts_client(3));
        assert!(!newer.accepts_client(1));
    }

    #[test]
    fn test_error_kind_mapping() {
        let path = SyncPath::from(RelativePath::new("a").unwrap());
        assert_eq!(ErrorKind::of(&FsError::not_found(&path)), ErrorKind::NotFound);
        assert_eq!(
            ErrorKind::of(&FsError::wrong_type(&path, PathType::Dir, PathType::File)),
            ErrorKind::WrongType
        );
        assert_eq!(
            ErrorKind::of(&FsError::from(PathError::EscapesRoot("..".into()))),
            ErrorKind::InvalidPath
        );
        assert_eq!(ErrorKind::InvalidPath.status_code(), 400);
        assert_eq!(ErrorKind::AlreadyExists.status_code(), 409);
    }

    #[test]
    fn test_hash_query_defaults_to_sha256() {
        let query: FileHashQuery = serde_json::from_str(r#"{"path":"a/b"}"#).unwrap();
        assert_eq!(query.hash_type, HashAlgorithm::Sha256);

        let body = ErrorBody::new(ErrorKind::NotFound, "Path not found: a");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["kind"], "not_found");
        assert!(json.get("path").is_none());
        assert_eq!(ErrorKind::NotADirectory.to_string(), "not_a_directory");
    }

    #[test]
    fn test_error_body_rebuilds_fs_error() {
        let path = SyncPath::from(RelativePath::new("docs/a.txt").unwrap());
        let original = FsError::wrong_type(&path, PathType::File, PathType::Dir);

        let json = serde_json::to_string(&ErrorBody::from(&original)).unwrap();
        let body: ErrorBody = serde_json::from_str(&json).unwrap();

        match body.into_fs_error() {
            FsError::WrongType {
                path,
                expected,
                actual,
            } => {
                assert_eq!(path, "remote:docs/a.txt");
                assert_eq!(expected, PathType::File);
                assert_eq!(actual, PathType::Dir);
            }
            other => panic!("Expected WrongType, got {other:?}"),
        }

        let missing = ErrorBody::from(&FsError::not_found(&path)).into_fs_error();
        assert!(missing.is_not_found());
        assert_eq!(missing.to_string(), "Path not found: remote:docs/a.txt");

        let unauthorized = ErrorBody::new(ErrorKind::Unauthorized, "Token expired");
        assert!(unauthorized.into_fs_error().is_remote());
    }
}
