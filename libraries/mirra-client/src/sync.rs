//! Protocol negotiation with a peer.

use crate::error::{check_response, parse_json, send_error, Result};
use mirra_core::protocol::{HandshakeProtocol, SYNC_API_BASE};
use reqwest::Client;
use tracing::debug;

pub struct SyncClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> SyncClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Fetch the peer's current protocol.
    pub async fn handshake(&self) -> Result<HandshakeProtocol> {
        let url = format!("{}{}/handshake", self.base_url, SYNC_API_BASE);
        debug!(url = %url, "Performing handshake");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_token)
            .send()
            .await
            .map_err(send_error)?;

        let response = check_response(response).await?;
        parse_json(response, "handshake").await
    }
}
