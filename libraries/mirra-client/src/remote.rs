//! The [`FileSystem`] capability backed by a remote peer.

use crate::client::PeerClient;
use crate::error::Result as ClientResult;
use async_trait::async_trait;
use mirra_core::protocol::HandshakeProtocol;
use mirra_core::{
    AbsolutePath, FileSystem, FsError, HashAlgorithm, Location, PathError, PathType,
    RelativePath, Result, SyncPath,
};
use tracing::info;

/// A peer's file tree, addressed by paths relative to the user's root there.
///
/// Bytes only move in two shapes: a local file is uploaded and then moved
/// into place on the peer, or a peer file is downloaded into a local path.
#[derive(Debug, Clone)]
pub struct RemoteFileSystem {
    client: PeerClient,
    protocol: HandshakeProtocol,
}

impl RemoteFileSystem {
    /// Handshake with the peer, refusing incompatible protocol versions.
    pub async fn connect(client: PeerClient) -> ClientResult<Self> {
        let protocol = client.check_compatibility().await?;
        info!(url = %client.url(), version = protocol.version, "Connected to peer");
        Ok(Self { client, protocol })
    }

    pub fn client(&self) -> &PeerClient {
        &self.client
    }

    /// The protocol agreed at connect time.
    pub fn protocol(&self) -> &HandshakeProtocol {
        &self.protocol
    }
}

fn relative(path: &SyncPath) -> Result<&RelativePath> {
    path.as_relative()
        .ok_or_else(|| FsError::InvalidPath(PathError::NotRelative(path.to_string())))
}

async fn local_source_type(path: &AbsolutePath) -> Result<PathType> {
    match tokio::fs::metadata(path.as_path()).await {
        Ok(metadata) if metadata.is_file() => Ok(PathType::File),
        Ok(metadata) if metadata.is_dir() => Ok(PathType::Dir),
        Ok(_) => Ok(PathType::Other),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PathType::Null),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl FileSystem for RemoteFileSystem {
    fn location(&self) -> Location {
        Location::Remote
    }

    async fn exists(&self, path: &SyncPath) -> Result<bool> {
        Ok(self.client.path()?.exists(relative(path)?).await?)
    }

    async fn resolve_type(&self, path: &SyncPath) -> Result<PathType> {
        Ok(self.client.path()?.path_type(relative(path)?).await?)
    }

    async fn hash_file(
        &self,
        path: &SyncPath,
        algorithm: HashAlgorithm,
    ) -> Result<Option<String>> {
        Ok(self
            .client
            .path()?
            .file_hash(relative(path)?, algorithm)
            .await?)
    }

    async fn read_directory(&self, path: &SyncPath) -> Result<Option<Vec<String>>> {
        let names = self.client.path()?.read_directory(relative(path)?).await?;
        Ok(names.map(|mut names| {
            names.sort();
            names
        }))
    }

    async fn create_directory(&self, path: &SyncPath) -> Result<()> {
        Ok(self
            .client
            .path()?
            .create_directory(relative(path)?)
            .await?)
    }

    async fn delete_file(&self, path: &SyncPath) -> Result<()> {
        Ok(self.client.path()?.delete_file(relative(path)?).await?)
    }

    async fn delete_directory(&self, path: &SyncPath) -> Result<()> {
        Ok(self
            .client
            .path()?
            .delete_directory(relative(path)?)
            .await?)
    }

    /// Upload a local file and move it into place on the peer.
    async fn copy_file(&self, from: &SyncPath, to: &SyncPath) -> Result<()> {
        let source = from.as_absolute().ok_or_else(|| {
            FsError::Unsupported(format!(
                "Copying {} requires a local source file",
                from
            ))
        })?;
        let destination = relative(to)?;

        match local_source_type(source).await? {
            PathType::File => {}
            PathType::Null => return Err(FsError::not_found(from)),
            other => return Err(FsError::wrong_type(from, PathType::File, other)),
        }

        let uploaded_file_id = self.client.upload()?.upload_file(source.as_path()).await?;
        self.client
            .path()?
            .move_uploaded_file(&uploaded_file_id, destination)
            .await?;
        Ok(())
    }

    async fn move_file(&self, from: &SyncPath, to: &SyncPath) -> Result<()> {
        Err(FsError::Unsupported(format!(
            "Moving {} to {} on a remote peer",
            from, to
        )))
    }

    async fn download_file(&self, from: &SyncPath, to: &AbsolutePath) -> Result<()> {
        self.client
            .download()?
            .download_file(relative(from)?, to.as_path())
            .await?;
        Ok(())
    }
}
