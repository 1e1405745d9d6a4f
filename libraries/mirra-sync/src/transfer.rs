/// Moving file bytes between two file systems
use crate::endpoint::Endpoint;
use crate::error::{Result, SyncError};
use mirra_core::{AbsolutePath, FsError, Location, SyncPath};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Copies files from a source to a destination, whatever their locations.
///
/// A local source is handed to the destination's `copy_file`, which uploads
/// when the destination is remote. A remote source is first downloaded into a
/// staging directory that lives as long as the bridge, then moved into place
/// on a local destination or uploaded to a remote one.
#[derive(Debug, Default)]
pub struct TransferBridge {
    staging: Option<TempDir>,
    staged_files: u64,
}

impl TransferBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn transfer_file(
        &mut self,
        source: &Endpoint,
        from: &SyncPath,
        destination: &Endpoint,
        to: &SyncPath,
    ) -> Result<()> {
        match (source.fs.location(), destination.fs.location()) {
            (Location::Local, _) => {
                destination.fs.copy_file(from, to).await?;
            }
            (Location::Remote, Location::Local) => {
                let staged = self.stage(source, from).await?;
                destination
                    .fs
                    .move_file(&SyncPath::Absolute(staged), to)
                    .await?;
            }
            (Location::Remote, Location::Remote) => {
                let staged = self.stage(source, from).await?;
                destination
                    .fs
                    .copy_file(&SyncPath::Absolute(staged.clone()), to)
                    .await?;
                if let Err(e) = tokio::fs::remove_file(staged.as_path()).await {
                    warn!("Failed to remove staged file {}: {}", staged, e);
                }
            }
        }
        Ok(())
    }

    /// Download `from` into a fresh file in the staging directory.
    async fn stage(&mut self, source: &Endpoint, from: &SyncPath) -> Result<AbsolutePath> {
        let dir = match self.staging.take() {
            Some(dir) => dir,
            None => tempfile::Builder::new()
                .prefix("mirra-staging-")
                .tempdir()
                .map_err(SyncError::Staging)?,
        };
        let name = format!(
            "{}-{}",
            self.staged_files,
            from.base_name().unwrap_or("file")
        );
        let staged = AbsolutePath::new(dir.path().join(name)).map_err(FsError::from);
        self.staging = Some(dir);
        let staged = staged?;
        self.staged_files += 1;

        debug!("Staging {} at {}", from, staged);
        source.fs.download_file(from, &staged).await?;
        Ok(staged)
    }

    /// Staging directory, if a download has happened.
    pub fn staging_dir(&self) -> Option<&std::path::Path> {
        self.staging.as_ref().map(TempDir::path)
    }
}
