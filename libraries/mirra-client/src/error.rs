//! Error types for the peer client.

use mirra_core::protocol::{ErrorBody, ErrorKind};
use mirra_core::FsError;
use reqwest::{Response, StatusCode};
use thiserror::Error;

/// Errors that can occur when talking to a Mirra peer.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Peer returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError {
        status: u16,
        message: String,
        body: Option<ErrorBody>,
    },

    /// No access token configured
    #[error("Authentication required")]
    AuthRequired,

    /// Peer rejected the access token
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid peer URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse peer response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// IO error during upload/download
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Peer is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Peer speaks a protocol this client cannot use
    #[error("Server protocol version {server_version} is incompatible with client version {client_version}")]
    IncompatibleVersion {
        server_version: u32,
        client_version: u32,
    },
}

impl ClientError {
    /// Error category reported by the peer, if any.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::ServerError {
                body: Some(body), ..
            } => Some(body.kind),
            _ => None,
        }
    }
}

/// Result type for peer client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Classify a failure to send a request.
pub(crate) fn send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// Pass a successful response through, turn anything else into an error.
pub(crate) async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorBody>(&text).ok();
    let message = body.as_ref().map_or(text, |body| body.error.clone());

    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::AuthFailed(message));
    }

    Err(ClientError::ServerError {
        status: status.as_u16(),
        message,
        body,
    })
}

/// Parse a JSON response body.
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

impl From<ClientError> for FsError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::ServerError {
                body: Some(body), ..
            } => body.into_fs_error(),
            ClientError::ServerError {
                status, message, ..
            } => FsError::Protocol(format!("Server error ({}): {}", status, message)),
            ClientError::AuthRequired => {
                FsError::Authentication("No access token configured".to_string())
            }
            ClientError::AuthFailed(message) => FsError::Authentication(message),
            ClientError::ServerUnreachable(message) => FsError::Transport(message),
            ClientError::Request(e) => FsError::Transport(e.to_string()),
            ClientError::Io(e) => FsError::Io(e),
            e @ (ClientError::InvalidUrl(_)
            | ClientError::ParseError(_)
            | ClientError::IncompatibleVersion { .. }) => FsError::Protocol(e.to_string()),
        }
    }
}
