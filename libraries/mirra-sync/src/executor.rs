/// Apply phase - turns confirmed diffs into destination mutations
use crate::diffs::Diffs;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::transfer::TransferBridge;
use mirra_core::{PathType, RelativePath};
use tracing::{info, warn};

/// Apply `diffs` to the destination.
///
/// All deletes complete before any update, and all updates before any
/// create. The first error aborts the pass; earlier changes are kept.
pub async fn sync_diffs(
    source: &Endpoint,
    destination: &Endpoint,
    diffs: &Diffs,
    bridge: &mut TransferBridge,
) -> Result<()> {
    if !diffs.to_delete.is_empty() {
        info!("Deleting {} entries from destination", diffs.to_delete.len());
        for path in &diffs.to_delete {
            info!("Deleting \"{}\"", path);
            destination.fs.delete(&destination.path(path)).await?;
        }
    }

    if !diffs.to_update.is_empty() {
        info!("Updating {} entries in destination", diffs.to_update.len());
        for path in &diffs.to_update {
            info!("Updating \"{}\"", path);
            destination.fs.delete(&destination.path(path)).await?;
            create(source, destination, path, bridge).await?;
        }
    }

    if !diffs.to_create.is_empty() {
        info!("Creating {} entries in destination", diffs.to_create.len());
        for path in &diffs.to_create {
            info!("Creating \"{}\"", path);
            create(source, destination, path, bridge).await?;
        }
    }

    Ok(())
}

async fn create(
    source: &Endpoint,
    destination: &Endpoint,
    path: &RelativePath,
    bridge: &mut TransferBridge,
) -> Result<()> {
    let from = source.path(path);
    let to = destination.path(path);

    match source.fs.resolve_type(&from).await? {
        PathType::Dir => destination.fs.create_directory(&to).await?,
        PathType::File => bridge.transfer_file(source, &from, destination, &to).await?,
        other => warn!("Ignored \"{}\" because of unsupported type: {}", path, other),
    }
    Ok(())
}
