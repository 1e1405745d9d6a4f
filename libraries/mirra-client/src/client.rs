//! Main peer client.

use crate::download::DownloadClient;
use crate::error::{check_response, parse_json, send_error, ClientError, Result};
use crate::path::PathClient;
use crate::sync::SyncClient;
use crate::types::ClientConfig;
use crate::upload::UploadClient;
use mirra_core::protocol::{HandshakeProtocol, HealthResponse, CLIENT_PROTOCOL_VERSION, HEALTH_ROUTE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Client for a single Mirra peer.
///
/// Protected operations are reached through short-lived sub-clients
/// (`path()`, `sync()`, `upload()`, `download()`), each of which fails with
/// [`ClientError::AuthRequired`] when no access token is configured.
#[derive(Debug, Clone)]
pub struct PeerClient {
    http: Client,
    url: String,
    access_token: Option<String>,
}

impl PeerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", url, e)))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Mirra/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            url,
            access_token: config.access_token,
        })
    }

    /// Get the peer URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Check that the peer is up.
    ///
    /// This does not require authentication.
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}{}", self.url, HEALTH_ROUTE);
        debug!(url = %url, "Checking peer health");

        let response = self.http.get(&url).send().await.map_err(send_error)?;
        let response = check_response(response).await?;
        parse_json(response, "health response").await
    }

    /// Fetch the peer's protocol and verify this client may talk to it.
    pub async fn check_compatibility(&self) -> Result<HandshakeProtocol> {
        let protocol = self.sync()?.handshake().await?;

        if !protocol.accepts_client(CLIENT_PROTOCOL_VERSION) {
            return Err(ClientError::IncompatibleVersion {
                server_version: protocol.version,
                client_version: CLIENT_PROTOCOL_VERSION,
            });
        }

        info!(
            url = %self.url,
            server_version = protocol.version,
            client_version = CLIENT_PROTOCOL_VERSION,
            "Peer protocol is compatible"
        );
        Ok(protocol)
    }

    fn token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or(ClientError::AuthRequired)
    }

    /// Get a client for path operations.
    pub fn path(&self) -> Result<PathClient<'_>> {
        Ok(PathClient::new(&self.http, &self.url, self.token()?))
    }

    /// Get a client for protocol negotiation.
    pub fn sync(&self) -> Result<SyncClient<'_>> {
        Ok(SyncClient::new(&self.http, &self.url, self.token()?))
    }

    /// Get a client for uploading files.
    pub fn upload(&self) -> Result<UploadClient<'_>> {
        Ok(UploadClient::new(&self.http, &self.url, self.token()?))
    }

    /// Get a client for downloading files.
    pub fn download(&self) -> Result<DownloadClient<'_>> {
        Ok(DownloadClient::new(&self.http, &self.url, self.token()?))
    }
}
