use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Change applied to one destination entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
}

impl SyncOperation {
    /// Confirmation order. Apply order is the reverse.
    pub const ALL: [SyncOperation; 3] = [Self::Create, Self::Update, Self::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the exception list is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionMode {
    /// Only listed paths are synced
    Allowlist,
    /// Everything except listed paths is synced
    #[default]
    Blocklist,
}

impl FromStr for ExceptionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allowlist" => Ok(Self::Allowlist),
            "blocklist" => Ok(Self::Blocklist),
            other => Err(format!(
                "Invalid exception mode: {other} (expected allowlist or blocklist)"
            )),
        }
    }
}

impl fmt::Display for ExceptionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Allowlist => "allowlist",
            Self::Blocklist => "blocklist",
        })
    }
}

/// Phase of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Idle,
    Validating,
    Scanning,
    Confirming,
    Applying,
    Done,
    Aborted,
}

impl SyncState {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Trees already matched
    NoDiffs,
    /// Every change was declined
    NothingConfirmed,
    Applied,
}

/// Summary of a completed sync run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSummary {
    pub outcome: SyncOutcome,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub started_at: String,
    pub completed_at: String,
    pub duration_ms: u64,
}

impl SyncSummary {
    pub fn total_changes(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}
