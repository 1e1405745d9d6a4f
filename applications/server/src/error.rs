/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mirra_core::protocol::{ErrorBody, ErrorKind};
use mirra_core::FsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    FileSystem(#[from] FsError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl ServerError {
    /// Wire form of the error. Internal details are logged, not sent.
    pub fn body(&self) -> ErrorBody {
        match self {
            ServerError::Auth(msg) => ErrorBody::new(ErrorKind::Unauthorized, msg.clone()),
            ServerError::Jwt(e) => {
                tracing::warn!("JWT error: {:?}", e);
                ErrorBody::new(ErrorKind::Unauthorized, "Invalid token")
            }
            ServerError::BadRequest(msg) => ErrorBody::new(ErrorKind::BadRequest, msg.clone()),
            ServerError::FileSystem(e) => {
                let body = ErrorBody::from(e);
                if body.kind == ErrorKind::Internal {
                    tracing::error!("File system error: {:?}", e);
                    ErrorBody::new(ErrorKind::Internal, "File system error")
                } else {
                    body
                }
            }
            ServerError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorBody::new(ErrorKind::Internal, "Internal server error")
            }
            ServerError::Config(msg) => {
                tracing::error!("Config error: {}", msg);
                ErrorBody::new(ErrorKind::Internal, "Configuration error")
            }
            ServerError::Io(e) => {
                tracing::error!("IO error: {:?}", e);
                ErrorBody::new(ErrorKind::Internal, "IO error")
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = self.body();
        let status = StatusCode::from_u16(body.kind.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(body)).into_response()
    }
}
