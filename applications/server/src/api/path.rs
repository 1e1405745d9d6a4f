/// Path API routes - the FileSystem operations of a peer
///
/// Paths arrive as strings and are parsed here so a bad path is answered
/// with an `invalid_path` error body.
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use mirra_core::protocol::{UploadResponse, UPLOAD_FIELD};
use mirra_core::{FsError, HashAlgorithm, PathType, RelativePath};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

#[derive(Debug, Deserialize)]
pub struct PathParams {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct HashParams {
    #[serde(default)]
    pub path: String,
    pub hash_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DirectoryBody {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveUploadedBody {
    pub uploaded_file_id: String,
    pub destination_path: String,
}

fn parse_path(raw: &str) -> Result<RelativePath> {
    RelativePath::new(raw).map_err(|e| ServerError::FileSystem(FsError::from(e)))
}

/// GET /api/path/v1/exists
pub async fn exists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<PathParams>,
) -> Result<Json<bool>> {
    let path = parse_path(&params.path)?;
    Ok(Json(app_state.storage.exists(auth.user_id(), &path).await?))
}

/// GET /api/path/v1/path-type
pub async fn path_type(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<PathParams>,
) -> Result<Json<PathType>> {
    let path = parse_path(&params.path)?;
    Ok(Json(app_state.storage.path_type(auth.user_id(), &path).await?))
}

/// GET /api/path/v1/directory/read
/// Entry names, `[]` for a missing path, `null` for a non-directory
pub async fn read_directory(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<PathParams>,
) -> Result<Json<Option<Vec<String>>>> {
    let path = parse_path(&params.path)?;
    let names = app_state
        .storage
        .read_directory(auth.user_id(), &path)
        .await?;
    Ok(Json(names))
}

/// POST /api/path/v1/directory
pub async fn create_directory(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(body): Json<DirectoryBody>,
) -> Result<StatusCode> {
    let path = parse_path(&body.path)?;
    app_state
        .storage
        .create_directory(auth.user_id(), &path)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/path/v1/directory
pub async fn delete_directory(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<PathParams>,
) -> Result<StatusCode> {
    let path = parse_path(&params.path)?;
    app_state
        .storage
        .delete_directory(auth.user_id(), &path)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/path/v1/file
pub async fn delete_file(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<PathParams>,
) -> Result<StatusCode> {
    let path = parse_path(&params.path)?;
    app_state.storage.delete_file(auth.user_id(), &path).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/path/v1/file/hash
/// Hex digest, `null` when the path is not a file
pub async fn file_hash(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<HashParams>,
) -> Result<Json<Option<String>>> {
    let path = parse_path(&params.path)?;
    let algorithm = match params.hash_type.as_deref() {
        None | Some("") => HashAlgorithm::default(),
        Some(name) => name
            .parse::<HashAlgorithm>()
            .map_err(ServerError::BadRequest)?,
    };

    let digest = app_state
        .storage
        .file_hash(auth.user_id(), &path, algorithm)
        .await?;
    Ok(Json(digest))
}

/// POST /api/path/v1/file/upload
/// Stream the `file` part of a multipart body into the staging area
pub async fn upload_file(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<UploadResponse>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    if !content_type.starts_with("multipart/form-data") {
        return Err(ServerError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }

    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| ServerError::BadRequest(format!("Missing boundary: {}", e)))?;
    let mut multipart = multer::Multipart::new(body.into_data_stream(), boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let uploaded_file_id = app_state.storage.stage_upload(field).await?;
        return Ok(Json(UploadResponse { uploaded_file_id }));
    }

    Err(ServerError::BadRequest(format!(
        "Missing \"{}\" field",
        UPLOAD_FIELD
    )))
}

/// POST /api/path/v1/file/move-uploaded
pub async fn move_uploaded_file(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(body): Json<MoveUploadedBody>,
) -> Result<StatusCode> {
    let destination = parse_path(&body.destination_path)?;
    app_state
        .storage
        .move_uploaded(auth.user_id(), &body.uploaded_file_id, &destination)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/path/v1/file/download
pub async fn download_file(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<PathParams>,
) -> Result<Response> {
    let path = parse_path(&params.path)?;
    let (file, file_size) = app_state.storage.open_file(auth.user_id(), &path).await?;

    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, file_size)
        .body(body)
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}
