/// Peer storage - per-user trees and the upload staging area
use crate::error::{Result, ServerError};
use futures_util::{Stream, StreamExt};
use mirra_core::{
    AbsolutePath, FileSystem, FsError, HashAlgorithm, PathType, RelativePath, SyncPath,
};
use mirra_fs::LocalFileSystem;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Directory name of a user's tree. Rejects ids that are not a single path
/// component.
pub fn user_directory(user_id: &str) -> Result<RelativePath> {
    RelativePath::root()
        .join_name(user_id)
        .map_err(|e| ServerError::Auth(format!("Invalid user id: {}", e)))
}

#[derive(Debug, Clone)]
pub struct PeerStorage {
    root: AbsolutePath,
    uploads: AbsolutePath,
    fs: LocalFileSystem,
}

impl PeerStorage {
    /// Relative storage paths are resolved against the working directory.
    pub fn new(root: &Path, uploads: &Path) -> Result<Self> {
        Ok(Self {
            root: absolutize(root)?,
            uploads: absolutize(uploads)?,
            fs: LocalFileSystem::new(),
        })
    }

    /// Create the storage directories
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(self.root.as_path()).await?;
        fs::create_dir_all(self.uploads.as_path()).await?;
        Ok(())
    }

    pub fn root(&self) -> &AbsolutePath {
        &self.root
    }

    pub fn uploads(&self) -> &AbsolutePath {
        &self.uploads
    }

    pub fn user_root(&self, user_id: &str) -> Result<AbsolutePath> {
        Ok(self.root.join(&user_directory(user_id)?))
    }

    fn resolve(&self, user_id: &str, path: &RelativePath) -> Result<(AbsolutePath, SyncPath)> {
        let user_root = self.user_root(user_id)?;
        let full = SyncPath::from(user_root.join(path));
        Ok((user_root, full))
    }

    /// Rewrite server paths in `error` to the form the client addressed them
    /// by, so no server layout leaks into responses.
    fn scrub(&self, user_root: &AbsolutePath, error: FsError) -> ServerError {
        let public = |path: String| -> String {
            let Ok(absolute) = AbsolutePath::new(&path) else {
                return path;
            };
            if let Some(relative) = absolute.relative_to(user_root) {
                return SyncPath::from(relative).to_string();
            }
            if let Some(staged) = absolute.relative_to(&self.uploads) {
                return format!("upload:{}", staged);
            }
            absolute.base_name().unwrap_or_default().to_string()
        };

        let error = match error {
            FsError::NotFound(path) => FsError::NotFound(public(path)),
            FsError::AlreadyExists(path) => FsError::AlreadyExists(public(path)),
            FsError::NotADirectory(path) => FsError::NotADirectory(public(path)),
            FsError::WrongType {
                path,
                expected,
                actual,
            } => FsError::WrongType {
                path: public(path),
                expected,
                actual,
            },
            other => other,
        };
        ServerError::FileSystem(error)
    }

    pub async fn exists(&self, user_id: &str, path: &RelativePath) -> Result<bool> {
        let (user_root, full) = self.resolve(user_id, path)?;
        self.fs
            .exists(&full)
            .await
            .map_err(|e| self.scrub(&user_root, e))
    }

    pub async fn path_type(&self, user_id: &str, path: &RelativePath) -> Result<PathType> {
        let (user_root, full) = self.resolve(user_id, path)?;
        self.fs
            .resolve_type(&full)
            .await
            .map_err(|e| self.scrub(&user_root, e))
    }

    pub async fn read_directory(
        &self,
        user_id: &str,
        path: &RelativePath,
    ) -> Result<Option<Vec<String>>> {
        let (user_root, full) = self.resolve(user_id, path)?;
        self.fs
            .read_directory(&full)
            .await
            .map_err(|e| self.scrub(&user_root, e))
    }

    pub async fn file_hash(
        &self,
        user_id: &str,
        path: &RelativePath,
        algorithm: HashAlgorithm,
    ) -> Result<Option<String>> {
        let (user_root, full) = self.resolve(user_id, path)?;
        self.fs
            .hash_file(&full, algorithm)
            .await
            .map_err(|e| self.scrub(&user_root, e))
    }

    pub async fn create_directory(&self, user_id: &str, path: &RelativePath) -> Result<()> {
        let (user_root, full) = self.resolve(user_id, path)?;
        self.fs
            .create_directory(&full)
            .await
            .map_err(|e| self.scrub(&user_root, e))
    }

    pub async fn delete_directory(&self, user_id: &str, path: &RelativePath) -> Result<()> {
        let (user_root, full) = self.resolve(user_id, path)?;
        self.fs
            .delete_directory(&full)
            .await
            .map_err(|e| self.scrub(&user_root, e))
    }

    pub async fn delete_file(&self, user_id: &str, path: &RelativePath) -> Result<()> {
        let (user_root, full) = self.resolve(user_id, path)?;
        self.fs
            .delete_file(&full)
            .await
            .map_err(|e| self.scrub(&user_root, e))
    }

    /// Write `chunks` to a new staged upload and return its id.
    ///
    /// A partial upload is removed when the stream fails.
    pub async fn stage_upload<S, E>(&self, chunks: S) -> Result<String>
    where
        S: Stream<Item = std::result::Result<bytes::Bytes, E>>,
        E: std::fmt::Display,
    {
        let mut chunks = std::pin::pin!(chunks);
        let id = Uuid::new_v4().to_string();
        let staged = self.uploads.as_path().join(&id);

        let mut file = File::create(&staged).await?;
        let mut written: u64 = 0;
        let result: Result<()> = async {
            while let Some(chunk) = chunks.next().await {
                let chunk = chunk
                    .map_err(|e| ServerError::BadRequest(format!("Upload interrupted: {}", e)))?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(e) = result {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&staged).await {
                tracing::warn!("Failed to remove partial upload {}: {}", id, cleanup);
            }
            return Err(e);
        }

        tracing::debug!("Staged upload {} ({} bytes)", id, written);
        Ok(id)
    }

    /// Move a staged upload into the user's tree, replacing any entry there.
    ///
    /// Only ids handed out by [`stage_upload`](Self::stage_upload) are accepted.
    pub async fn move_uploaded(
        &self,
        user_id: &str,
        uploaded_file_id: &str,
        destination: &RelativePath,
    ) -> Result<()> {
        let id = Uuid::parse_str(uploaded_file_id)
            .map_err(|_| ServerError::BadRequest("Invalid uploaded file id".to_string()))?;
        let staged_name = RelativePath::root()
            .join_name(&id.to_string())
            .map_err(FsError::from)?;
        let staged_file = self.uploads.join(&staged_name);
        let staged = SyncPath::from(staged_file.clone());

        let moved = async {
            let (user_root, full) = self.resolve(user_id, destination)?;
            if destination.is_root() {
                return Err(self.scrub(
                    &user_root,
                    FsError::wrong_type(&full, PathType::File, PathType::Dir),
                ));
            }
            self.fs
                .move_file(&staged, &full)
                .await
                .map_err(|e| self.scrub(&user_root, e))
        }
        .await;

        if let Err(e) = moved {
            match fs::remove_file(staged_file.as_path()).await {
                Ok(()) => tracing::debug!("Discarded upload {} after a failed move", id),
                Err(cleanup) if cleanup.kind() == std::io::ErrorKind::NotFound => {}
                Err(cleanup) => {
                    tracing::warn!("Failed to remove staged upload {}: {}", id, cleanup);
                }
            }
            return Err(e);
        }

        tracing::debug!("Moved upload {} to {}", id, destination);
        Ok(())
    }

    /// Open a user file for streaming, with its length.
    pub async fn open_file(&self, user_id: &str, path: &RelativePath) -> Result<(File, u64)> {
        let (user_root, full) = self.resolve(user_id, path)?;
        let path_type = self
            .fs
            .resolve_type(&full)
            .await
            .map_err(|e| self.scrub(&user_root, e))?;

        match path_type {
            PathType::File => {}
            PathType::Null => return Err(self.scrub(&user_root, FsError::not_found(&full))),
            other => {
                return Err(self.scrub(
                    &user_root,
                    FsError::wrong_type(&full, PathType::File, other),
                ))
            }
        }

        let absolute = user_root.join(path);
        let file = File::open(absolute.as_path()).await?;
        let len = file.metadata().await?.len();
        Ok((file, len))
    }
}

fn absolutize(path: &Path) -> Result<AbsolutePath> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    AbsolutePath::new(path).map_err(|e| ServerError::Config(e.to_string()))
}
