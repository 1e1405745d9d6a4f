//! File upload to a peer's staging area.

use crate::error::{check_response, parse_json, send_error, ClientError, Result};
use mirra_core::protocol::{UploadResponse, PATH_API_BASE, UPLOAD_FIELD};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::path::Path;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

/// Upload client for a Mirra peer.
pub struct UploadClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> UploadClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Stream a local file to the peer.
    ///
    /// # Returns
    /// The opaque id of the staged file, to be passed to
    /// [`PathClient::move_uploaded_file`](crate::PathClient::move_uploaded_file).
    pub async fn upload_file(&self, file_path: &Path) -> Result<String> {
        let file = File::open(file_path).await?;
        let file_size = file.metadata().await?.len();

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        debug!(file = %file_path.display(), size = file_size, "Uploading file");

        let body = Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, file_size)
            .file_name(file_name.clone())
            .mime_str("application/octet-stream")
            .map_err(ClientError::Request)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let url = format!("{}{}/file/upload", self.base_url, PATH_API_BASE);
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;

        let response = check_response(response).await?;
        let upload: UploadResponse = parse_json(response, "upload response").await?;

        info!(
            id = %upload.uploaded_file_id,
            file = %file_name,
            size = file_size,
            "File uploaded"
        );
        Ok(upload.uploaded_file_id)
    }
}
