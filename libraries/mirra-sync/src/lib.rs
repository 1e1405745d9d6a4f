//! Mirra sync engine
//!
//! One-way synchronization of a source directory tree into a destination
//! tree. Either side may be local disk or a remote peer; the engine only sees
//! the [`mirra_core::FileSystem`] capability.
//!
//! A run moves through four phases:
//!
//! 1. **Validating**: the roots exist and are directories
//! 2. **Scanning**: breadth-first diff of the two trees into [`Diffs`]
//! 3. **Confirming**: optional per-path operator confirmation
//! 4. **Applying**: deletes, then updates, then creates
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mirra_core::{AbsolutePath, SyncPath};
//! use mirra_fs::LocalFileSystem;
//! use mirra_sync::{Syncer, SyncerConfig};
//!
//! let config = SyncerConfig::new(
//!     SyncPath::from(AbsolutePath::new("/home/me/photos")?),
//!     SyncPath::from(AbsolutePath::new("/mnt/backup/photos")?),
//! )
//! .skip_confirmation(true);
//!
//! let fs = Arc::new(LocalFileSystem::new());
//! let mut syncer = Syncer::new(config, fs.clone(), fs)?;
//! let summary = syncer.start_sync().await?;
//! println!("{} created, {} updated, {} deleted", summary.created, summary.updated, summary.deleted);
//! ```

mod confirm;
mod diffs;
mod endpoint;
mod error;
mod exceptions;
mod executor;
mod scanner;
mod syncer;
mod transfer;
mod types;

// Public exports
pub use confirm::{confirm_diffs, parse_answer, Answer, AutoApprove, Prompter, StdinPrompter};
pub use diffs::Diffs;
pub use endpoint::Endpoint;
pub use error::{Result, SyncError};
pub use exceptions::{ExceptionList, ExceptionPolicy};
pub use executor::sync_diffs;
pub use scanner::scan_diffs;
pub use syncer::{Syncer, SyncerConfig};
pub use transfer::TransferBridge;
pub use types::{ExceptionMode, SyncOperation, SyncOutcome, SyncState, SyncSummary};
