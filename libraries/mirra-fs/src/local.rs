/// Local disk file system
use async_trait::async_trait;
use mirra_core::{
    hash, AbsolutePath, FileSystem, FsError, HashAlgorithm, Location, PathError, PathType,
    Result, SyncPath,
};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn absolute(path: &SyncPath) -> Result<&AbsolutePath> {
    path.as_absolute()
        .ok_or_else(|| FsError::InvalidPath(PathError::NotAbsolute(path.to_string())))
}

async fn path_type_of(path: &Path) -> Result<PathType> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PathType::Null),
        Err(e) => return Err(e.into()),
    };

    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        // Follow the link once to classify its target
        return Ok(match fs::metadata(path).await {
            Ok(target) if target.is_dir() => PathType::SymlinkDir,
            Ok(target) if target.is_file() => PathType::SymlinkFile,
            _ => PathType::Other,
        });
    }

    Ok(if file_type.is_dir() {
        PathType::Dir
    } else if file_type.is_file() {
        PathType::File
    } else {
        PathType::Other
    })
}

async fn ensure_parent(path: &AbsolutePath) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent.as_path()).await?;
    }
    Ok(())
}

impl LocalFileSystem {
    async fn require_source_file(&self, path: &SyncPath) -> Result<()> {
        match self.resolve_type(path).await? {
            PathType::File => Ok(()),
            PathType::Null => Err(FsError::not_found(path)),
            other => Err(FsError::wrong_type(path, PathType::File, other)),
        }
    }

    /// Clear the destination slot and make sure its directory exists.
    async fn prepare_destination(&self, to: &SyncPath) -> Result<()> {
        self.delete(to).await?;
        ensure_parent(absolute(to)?).await
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    fn location(&self) -> Location {
        Location::Local
    }

    async fn exists(&self, path: &SyncPath) -> Result<bool> {
        Ok(self.resolve_type(path).await?.exists())
    }

    async fn resolve_type(&self, path: &SyncPath) -> Result<PathType> {
        path_type_of(absolute(path)?.as_path()).await
    }

    async fn hash_file(
        &self,
        path: &SyncPath,
        algorithm: HashAlgorithm,
    ) -> Result<Option<String>> {
        if self.resolve_type(path).await? != PathType::File {
            return Ok(None);
        }
        let digest = hash::hash_file(absolute(path)?.as_path(), algorithm).await?;
        Ok(Some(digest))
    }

    async fn read_directory(&self, path: &SyncPath) -> Result<Option<Vec<String>>> {
        match self.resolve_type(path).await? {
            PathType::Null => return Ok(Some(Vec::new())),
            PathType::Dir => {}
            _ => return Ok(None),
        }

        let mut entries = fs::read_dir(absolute(path)?.as_path()).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry
                .file_name()
                .into_string()
                .map_err(|raw| PathError::NotUtf8(raw.to_string_lossy().into_owned()))?;
            names.push(name);
        }
        names.sort();
        Ok(Some(names))
    }

    async fn create_directory(&self, path: &SyncPath) -> Result<()> {
        if self.exists(path).await? {
            return Err(FsError::already_exists(path));
        }
        tracing::debug!("Creating directory {}", path);
        fs::create_dir_all(absolute(path)?.as_path()).await?;
        Ok(())
    }

    async fn delete_file(&self, path: &SyncPath) -> Result<()> {
        match self.resolve_type(path).await? {
            PathType::Null => Err(FsError::not_found(path)),
            PathType::Dir => Err(FsError::wrong_type(path, PathType::File, PathType::Dir)),
            _ => {
                tracing::debug!("Deleting file {}", path);
                fs::remove_file(absolute(path)?.as_path()).await?;
                Ok(())
            }
        }
    }

    async fn delete_directory(&self, path: &SyncPath) -> Result<()> {
        match self.resolve_type(path).await? {
            PathType::Dir => {
                tracing::debug!("Deleting directory {}", path);
                fs::remove_dir_all(absolute(path)?.as_path()).await?;
                Ok(())
            }
            PathType::Null => Err(FsError::not_found(path)),
            other => Err(FsError::wrong_type(path, PathType::Dir, other)),
        }
    }

    async fn copy_file(&self, from: &SyncPath, to: &SyncPath) -> Result<()> {
        self.require_source_file(from).await?;
        self.prepare_destination(to).await?;
        tracing::debug!("Copying {} to {}", from, to);
        fs::copy(absolute(from)?.as_path(), absolute(to)?.as_path()).await?;
        Ok(())
    }

    async fn move_file(&self, from: &SyncPath, to: &SyncPath) -> Result<()> {
        self.require_source_file(from).await?;
        self.prepare_destination(to).await?;

        let source = absolute(from)?.as_path();
        let destination = absolute(to)?.as_path();
        tracing::debug!("Moving {} to {}", from, to);
        if let Err(e) = fs::rename(source, destination).await {
            // Rename cannot cross devices, fall back to copy and remove
            tracing::debug!("Rename failed ({}), copying instead", e);
            fs::copy(source, destination).await?;
            fs::remove_file(source).await?;
        }
        Ok(())
    }

    async fn download_file(&self, from: &SyncPath, to: &AbsolutePath) -> Result<()> {
        self.copy_file(from, &SyncPath::Absolute(to.clone())).await
    }
}
