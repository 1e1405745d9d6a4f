/// Diff scanner - breadth-first comparison of two directory trees
use crate::diffs::Diffs;
use crate::endpoint::Endpoint;
use crate::error::{Result, SyncError};
use crate::exceptions::ExceptionPolicy;
use crate::types::SyncOperation;
use mirra_core::{HashAlgorithm, PathType, RelativePath};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// A directory waiting to be compared.
#[derive(Debug, Clone)]
struct ScanTask {
    path: RelativePath,
    /// The destination entry at `path` is queued for deletion because it is
    /// not a directory, so its side of the subtree reads as missing.
    destination_replaced: bool,
    /// Walked only to reach an allowlisted path below it.
    traversal_only: bool,
}

/// Compare `source` against `destination` and list the changes needed.
///
/// Directories are visited in FIFO order starting at the roots. Within one
/// directory, children are visited in name order. Returns `None` when the
/// trees already match.
pub async fn scan_diffs(
    source: &Endpoint,
    destination: &Endpoint,
    policy: &ExceptionPolicy,
    algorithm: HashAlgorithm,
) -> Result<Option<Diffs>> {
    let mut diffs = Diffs::new();
    let mut pending = VecDeque::new();
    pending.push_back(ScanTask {
        path: RelativePath::root(),
        destination_replaced: false,
        traversal_only: false,
    });

    while let Some(task) = pending.pop_front() {
        scan_directory(source, destination, policy, algorithm, &task, &mut diffs, &mut pending)
            .await?;
    }

    Ok(diffs.into_option())
}

async fn read_children(endpoint: &Endpoint, path: &RelativePath) -> Result<Vec<String>> {
    let absolute = endpoint.path(path);
    endpoint
        .fs
        .read_directory(&absolute)
        .await?
        .ok_or_else(|| SyncError::NotADirectory(absolute.to_string()))
}

async fn scan_directory(
    source: &Endpoint,
    destination: &Endpoint,
    policy: &ExceptionPolicy,
    algorithm: HashAlgorithm,
    task: &ScanTask,
    diffs: &mut Diffs,
    pending: &mut VecDeque<ScanTask>,
) -> Result<()> {
    debug!("Scanning diffs for \"{}\"", task.path);

    let source_children = read_children(source, &task.path).await?;
    let destination_children = if task.destination_replaced {
        Vec::new()
    } else {
        read_children(destination, &task.path).await?
    };

    // Empty source directories are kept as directories on the destination
    if source_children.is_empty() && !task.traversal_only {
        let destination_exists = !task.destination_replaced
            && destination.fs.exists(&destination.path(&task.path)).await?;

        if !destination_exists {
            diffs.push(SyncOperation::Create, task.path.clone());
            return Ok(());
        }

        if !destination_children.is_empty() && !task.path.is_root() {
            // Replacing the directory also removes its children
            diffs.push(SyncOperation::Update, task.path.clone());
            return Ok(());
        }
    }

    let source_names: HashSet<&str> = source_children.iter().map(String::as_str).collect();
    let destination_names: HashSet<&str> =
        destination_children.iter().map(String::as_str).collect();

    for name in &source_children {
        let Ok(path) = task.path.join_name(name) else {
            warn!("Skipping \"{}\" in \"{}\": name cannot be synced", name, task.path);
            continue;
        };
        let source_type = source.fs.resolve_type(&source.path(&path)).await?;

        if !policy.is_allowed(&path, source_type == PathType::Dir) {
            continue;
        }

        if !matches!(source_type, PathType::File | PathType::Dir) {
            warn!("Skipping \"{}\": unsupported type {}", path, source_type);
            continue;
        }

        let child_task = |destination_replaced| ScanTask {
            path: path.clone(),
            destination_replaced,
            traversal_only: policy.is_traversal_only(&path),
        };

        if !destination_names.contains(name.as_str()) {
            match source_type {
                PathType::File => diffs.push(SyncOperation::Create, path.clone()),
                _ => pending.push_back(child_task(false)),
            }
            continue;
        }

        let destination_type = destination.fs.resolve_type(&destination.path(&path)).await?;

        if source_type != destination_type {
            match source_type {
                PathType::File => diffs.push(SyncOperation::Update, path.clone()),
                _ => {
                    diffs.push(SyncOperation::Delete, path.clone());
                    pending.push_back(child_task(true));
                }
            }
            continue;
        }

        match source_type {
            PathType::File => {
                let source_path = source.path(&path);
                let destination_path = destination.path(&path);
                let (source_hash, destination_hash) = tokio::try_join!(
                    source.fs.hash_file(&source_path, algorithm),
                    destination.fs.hash_file(&destination_path, algorithm),
                )?;
                if source_hash != destination_hash {
                    diffs.push(SyncOperation::Update, path.clone());
                }
            }
            _ => pending.push_back(child_task(false)),
        }
    }

    // Destination entries missing from the source
    for name in &destination_children {
        if !source_names.contains(name.as_str()) {
            match task.path.join_name(name) {
                Ok(path) => diffs.push(SyncOperation::Delete, path),
                Err(_) => warn!("Leaving \"{}\" in \"{}\": name cannot be synced", name, task.path),
            }
        }
    }

    Ok(())
}
