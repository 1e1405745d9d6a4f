//! Path operations on a peer.

use crate::error::{check_response, parse_json, send_error, Result};
use mirra_core::protocol::{
    CreateDirectoryRequest, FileHashQuery, MoveUploadedFileRequest, PathQuery, PATH_API_BASE,
};
use mirra_core::{HashAlgorithm, PathType, RelativePath};
use reqwest::{Client, Method, RequestBuilder};
use tracing::debug;

/// Path client for a Mirra peer.
///
/// Every path is relative to the authenticated user's root on the peer.
pub struct PathClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> PathClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.base_url, PATH_API_BASE, route);
        self.http.request(method, url).bearer_auth(self.access_token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        route: &str,
        query: &impl serde::Serialize,
        what: &str,
    ) -> Result<T> {
        let response = self
            .request(Method::GET, route)
            .query(query)
            .send()
            .await
            .map_err(send_error)?;
        let response = check_response(response).await?;
        parse_json(response, what).await
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await.map_err(send_error)?;
        check_response(response).await?;
        Ok(())
    }

    pub async fn exists(&self, path: &RelativePath) -> Result<bool> {
        let query = PathQuery { path: path.clone() };
        self.get_json("/exists", &query, "exists response").await
    }

    pub async fn path_type(&self, path: &RelativePath) -> Result<PathType> {
        let query = PathQuery { path: path.clone() };
        self.get_json("/path-type", &query, "path type").await
    }

    /// Entry names, `Some([])` if missing, `None` if not a directory.
    pub async fn read_directory(&self, path: &RelativePath) -> Result<Option<Vec<String>>> {
        let query = PathQuery { path: path.clone() };
        self.get_json("/directory/read", &query, "directory listing")
            .await
    }

    pub async fn file_hash(
        &self,
        path: &RelativePath,
        algorithm: HashAlgorithm,
    ) -> Result<Option<String>> {
        let query = FileHashQuery {
            path: path.clone(),
            hash_type: algorithm,
        };
        self.get_json("/file/hash", &query, "file hash").await
    }

    pub async fn create_directory(&self, path: &RelativePath) -> Result<()> {
        debug!(path = %path, "Creating remote directory");
        let body = CreateDirectoryRequest { path: path.clone() };
        self.send_empty(self.request(Method::POST, "/directory").json(&body))
            .await
    }

    pub async fn delete_directory(&self, path: &RelativePath) -> Result<()> {
        debug!(path = %path, "Deleting remote directory");
        let query = PathQuery { path: path.clone() };
        self.send_empty(self.request(Method::DELETE, "/directory").query(&query))
            .await
    }

    pub async fn delete_file(&self, path: &RelativePath) -> Result<()> {
        debug!(path = %path, "Deleting remote file");
        let query = PathQuery { path: path.clone() };
        self.send_empty(self.request(Method::DELETE, "/file").query(&query))
            .await
    }

    /// Move a previously uploaded file into place, replacing any entry there.
    pub async fn move_uploaded_file(
        &self,
        uploaded_file_id: &str,
        destination: &RelativePath,
    ) -> Result<()> {
        debug!(id = %uploaded_file_id, destination = %destination, "Moving uploaded file");
        let body = MoveUploadedFileRequest {
            uploaded_file_id: uploaded_file_id.to_string(),
            destination_path: destination.clone(),
        };
        self.send_empty(self.request(Method::POST, "/file/move-uploaded").json(&body))
            .await
    }
}
