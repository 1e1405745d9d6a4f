//! Mirra Core
//!
//! Platform-agnostic building blocks shared by the sync engine, the local and
//! remote file systems, the peer server and the command-line client.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Path values**: [`AbsolutePath`], [`RelativePath`], [`SyncPath`] and [`PathType`]
//! - **Content hashing**: [`hash_file`] and [`HashAlgorithm`]
//! - **The `FileSystem` capability**: one trait, implemented by `mirra-fs` (local disk)
//!   and `mirra-client` (remote peer)
//! - **Wire protocol**: request/response types spoken between client and peer
//! - **Error handling**: [`FsError`] and [`PathError`]
//!
//! # Example
//!
//! ```rust
//! use mirra_core::{AbsolutePath, RelativePath, SyncPath};
//!
//! let root = AbsolutePath::new("/backups/photos").unwrap();
//! let entry = RelativePath::new("2024/summer/beach.jpg").unwrap();
//!
//! let absolute = root.join(&entry);
//! assert_eq!(absolute.base_name(), Some("beach.jpg"));
//! assert_eq!(absolute.extension(), Some("jpg"));
//! assert_eq!(absolute.relative_to(&root), Some(entry.clone()));
//!
//! // A remote entry never carries a host path
//! let remote = SyncPath::from(RelativePath::new("photos").unwrap()).join(&entry);
//! assert_eq!(remote.as_relative().unwrap().as_str(), "photos/2024/summer/beach.jpg");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod hash;
pub mod path;
pub mod protocol;
pub mod traits;

pub use error::{FsError, Result};
pub use hash::{hash_bytes, hash_file, HashAlgorithm};
pub use path::{AbsolutePath, PathError, PathType, RelativePath, ResolvedPath, SyncPath};
pub use traits::{FileSystem, Location};
