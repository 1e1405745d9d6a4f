//! File download from a peer.

use crate::error::{check_response, send_error, Result};
use futures_util::StreamExt;
use mirra_core::protocol::{PathQuery, PATH_API_BASE};
use mirra_core::RelativePath;
use reqwest::Client;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Download client for a Mirra peer.
pub struct DownloadClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> DownloadClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Stream a peer file into `dest_path`, creating parent directories.
    ///
    /// # Returns
    /// The number of bytes written.
    pub async fn download_file(&self, path: &RelativePath, dest_path: &Path) -> Result<u64> {
        let url = format!("{}{}/file/download", self.base_url, PATH_API_BASE);
        debug!(url = %url, path = %path, dest = %dest_path.display(), "Downloading file");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_token)
            .query(&PathQuery { path: path.clone() })
            .send()
            .await
            .map_err(send_error)?;
        let response = check_response(response).await?;

        // Create parent directories if needed
        if let Some(parent) = dest_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(dest_path).await?;
        let mut downloaded: u64 = 0;

        // Stream the response body
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }
        file.flush().await?;

        info!(path = %path, bytes = downloaded, "File downloaded");
        Ok(downloaded)
    }
}
