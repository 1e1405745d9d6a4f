use crate::{
    confirm::{confirm_diffs, Prompter, StdinPrompter},
    diffs::Diffs,
    endpoint::Endpoint,
    error::{Result, SyncError},
    exceptions::{ExceptionList, ExceptionPolicy},
    executor, scanner,
    transfer::TransferBridge,
    types::{ExceptionMode, SyncOutcome, SyncState, SyncSummary},
};
use mirra_core::{FileSystem, HashAlgorithm, Location, PathType, SyncPath};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Inputs of a sync run
#[derive(Debug, Clone)]
pub struct SyncerConfig {
    pub source: SyncPath,
    pub destination: SyncPath,
    /// Addressed like `source`, each must lie under it
    pub exceptions: Vec<SyncPath>,
    pub exception_mode: ExceptionMode,
    pub skip_confirmation: bool,
    pub hash_algorithm: HashAlgorithm,
}

impl SyncerConfig {
    pub fn new(source: SyncPath, destination: SyncPath) -> Self {
        Self {
            source,
            destination,
            exceptions: Vec::new(),
            exception_mode: ExceptionMode::default(),
            skip_confirmation: false,
            hash_algorithm: HashAlgorithm::default(),
        }
    }

    #[must_use]
    pub fn exceptions(mut self, exceptions: Vec<SyncPath>, mode: ExceptionMode) -> Self {
        self.exceptions = exceptions;
        self.exception_mode = mode;
        self
    }

    #[must_use]
    pub fn skip_confirmation(mut self, skip: bool) -> Self {
        self.skip_confirmation = skip;
        self
    }
}

/// Main syncer that orchestrates one-way synchronization
pub struct Syncer {
    source: Endpoint,
    destination: Endpoint,
    policy: ExceptionPolicy,
    skip_confirmation: bool,
    algorithm: HashAlgorithm,
    prompter: Box<dyn Prompter>,
    state: watch::Sender<SyncState>,
}

impl Syncer {
    /// Fails with [`SyncError::InvalidException`] before any I/O when an
    /// exception lies outside the source root.
    pub fn new(
        config: SyncerConfig,
        source_fs: Arc<dyn FileSystem>,
        destination_fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let list = ExceptionList::new(&config.source, &config.exceptions)?;
        let (state, _) = watch::channel(SyncState::Idle);

        Ok(Self {
            source: Endpoint::new(source_fs, config.source),
            destination: Endpoint::new(destination_fs, config.destination),
            policy: ExceptionPolicy::new(list, config.exception_mode),
            skip_confirmation: config.skip_confirmation,
            algorithm: config.hash_algorithm,
            prompter: Box::new(StdinPrompter::new()),
            state,
        })
    }

    /// Replace the default stdin prompter.
    #[must_use]
    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    /// Follow state transitions from another task.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    fn transition(&self, next: SyncState) {
        info!("Sync state: {:?} -> {:?}", self.state(), next);
        self.state.send_replace(next);
    }

    /// Run a full sync: validate, scan, confirm, apply.
    pub async fn start_sync(&mut self) -> Result<SyncSummary> {
        let started_at = chrono::Utc::now();
        let start_time = Instant::now();

        info!(
            "Starting sync from {} to {} ({} exceptions, {} mode)",
            self.source.root,
            self.destination.root,
            self.policy.list().paths().len(),
            self.policy.mode()
        );

        let (outcome, applied) = match self.run().await {
            Ok(result) => result,
            Err(e) => {
                error!("Sync aborted: {}", e);
                self.transition(SyncState::Aborted);
                return Err(e);
            }
        };
        self.transition(SyncState::Done);

        let summary = SyncSummary {
            outcome,
            created: applied.to_create.len(),
            updated: applied.to_update.len(),
            deleted: applied.to_delete.len(),
            started_at: started_at.to_rfc3339(),
            completed_at: chrono::Utc::now().to_rfc3339(),
            duration_ms: u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        info!(
            "Sync complete ({:?}): {} created, {} updated, {} deleted in {}ms",
            summary.outcome, summary.created, summary.updated, summary.deleted, summary.duration_ms
        );

        Ok(summary)
    }

    async fn run(&mut self) -> Result<(SyncOutcome, Diffs)> {
        self.transition(SyncState::Validating);
        self.validate().await?;

        self.transition(SyncState::Scanning);
        let Some(diffs) = self.scan_diffs().await? else {
            info!("No diffs found, destination is up to date");
            return Ok((SyncOutcome::NoDiffs, Diffs::new()));
        };
        debug!("Found {} diffs\n{}", diffs.len(), diffs);

        let diffs = if self.skip_confirmation {
            diffs
        } else {
            self.transition(SyncState::Confirming);
            match self.confirm_diffs(diffs).await? {
                Some(confirmed) => confirmed,
                None => {
                    info!("No diffs confirmed, nothing to apply");
                    return Ok((SyncOutcome::NothingConfirmed, Diffs::new()));
                }
            }
        };

        self.transition(SyncState::Applying);
        self.sync_diffs(&diffs).await?;

        Ok((SyncOutcome::Applied, diffs))
    }

    /// Check both roots before anything is read or written.
    pub async fn validate(&self) -> Result<()> {
        let source_type = self.source.fs.resolve_type(&self.source.root).await?;
        if source_type != PathType::Dir {
            return Err(SyncError::InvalidRoot {
                path: self.source.root.to_string(),
                reason: match source_type {
                    PathType::Null => "source root does not exist".to_string(),
                    other => format!("source root is not a directory ({})", other),
                },
            });
        }

        let destination_type = self
            .destination
            .fs
            .resolve_type(&self.destination.root)
            .await?;
        if !matches!(destination_type, PathType::Dir | PathType::Null) {
            return Err(SyncError::InvalidRoot {
                path: self.destination.root.to_string(),
                reason: format!("destination root is not a directory ({})", destination_type),
            });
        }

        // Only meaningful when both roots are on this machine
        if self.source.fs.location() == Location::Local
            && self.destination.fs.location() == Location::Local
            && (self.destination.root.is_sub_path_of(&self.source.root)
                || self.source.root.is_sub_path_of(&self.destination.root))
        {
            return Err(SyncError::InvalidRoot {
                path: self.destination.root.to_string(),
                reason: format!("overlaps the source root {}", self.source.root),
            });
        }

        Ok(())
    }

    pub async fn scan_diffs(&self) -> Result<Option<Diffs>> {
        scanner::scan_diffs(&self.source, &self.destination, &self.policy, self.algorithm).await
    }

    pub async fn confirm_diffs(&mut self, diffs: Diffs) -> Result<Option<Diffs>> {
        confirm_diffs(diffs, self.prompter.as_mut()).await
    }

    pub async fn sync_diffs(&self, diffs: &Diffs) -> Result<()> {
        let mut bridge = TransferBridge::new();
        executor::sync_diffs(&self.source, &self.destination, diffs, &mut bridge).await
    }
}
