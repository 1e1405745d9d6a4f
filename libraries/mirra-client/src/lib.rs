//! Mirra Peer Client
//!
//! HTTP client library for the Mirra peer protocol.
//!
//! # Features
//!
//! - **Handshake**: protocol version negotiation before any file operation
//! - **Path operations**: type resolution, hashing, directory listing, create and delete
//! - **Upload**: stream a local file to the peer's staging area, then move it into place
//! - **Download**: stream a peer file into a local path
//! - **[`RemoteFileSystem`]**: the [`mirra_core::FileSystem`] capability backed by a peer
//!
//! # Example
//!
//! ```ignore
//! use mirra_client::{ClientConfig, PeerClient, RemoteFileSystem};
//! use mirra_core::{FileSystem, RelativePath, SyncPath};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::with_token("http://192.168.1.20:8080", "eyJ...");
//!     let client = PeerClient::new(config)?;
//!
//!     // Refuses to connect to a peer speaking an incompatible protocol
//!     let remote = RemoteFileSystem::connect(client).await?;
//!
//!     let photos = SyncPath::from(RelativePath::new("photos")?);
//!     println!("{:?}", remote.read_directory(&photos).await?);
//!     Ok(())
//! }
//! ```

mod client;
mod download;
mod error;
mod path;
mod remote;
mod sync;
mod types;
mod upload;

// Re-export main types
pub use client::PeerClient;
pub use error::{ClientError, Result};
pub use remote::RemoteFileSystem;
pub use types::ClientConfig;

// Re-export sub-clients for direct use if needed
pub use download::DownloadClient;
pub use path::PathClient;
pub use sync::SyncClient;
pub use upload::UploadClient;
