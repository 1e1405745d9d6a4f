//! Mirra local file system
//!
//! [`LocalFileSystem`] implements the [`mirra_core::FileSystem`] capability on
//! top of `tokio::fs`. It addresses entries by absolute path only.
//!
//! ```rust,no_run
//! use mirra_core::{AbsolutePath, FileSystem, SyncPath};
//! use mirra_fs::LocalFileSystem;
//!
//! # async fn example() -> mirra_core::Result<()> {
//! let fs = LocalFileSystem::new();
//! let dir = SyncPath::from(AbsolutePath::new("/tmp/mirra-demo").unwrap());
//! fs.create_directory(&dir).await?;
//! assert_eq!(fs.read_directory(&dir).await?, Some(vec![]));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod local;

pub use local::LocalFileSystem;
