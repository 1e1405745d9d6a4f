//! Client configuration.

use std::net::IpAddr;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to a Mirra peer.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the peer (e.g., "http://192.168.1.20:8080")
    pub url: String,
    /// Bearer token sent with every protected request
    pub access_token: Option<String>,
    /// Whole-request timeout, including upload and download bodies
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a config with an access token.
    pub fn with_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::new(url)
        }
    }

    /// Build the URL of a peer from its address and port.
    pub fn for_peer(address: IpAddr, port: u16) -> Self {
        let url = match address {
            IpAddr::V4(v4) => format!("http://{}:{}", v4, port),
            IpAddr::V6(v6) => format!("http://[{}]:{}", v6, port),
        };
        Self::new(url)
    }

    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
