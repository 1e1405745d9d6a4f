/// Command-line arguments and how they map onto sync endpoints
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mirra_core::{AbsolutePath, RelativePath, SyncPath};
use mirra_sync::ExceptionMode;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "mirra", version)]
#[command(about = "One-way sync between local directories and Mirra peers", long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ./mirra.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Make the destination tree mirror the source tree
    Sync(SyncArgs),
    /// Check that a peer speaks a protocol this client understands
    Handshake {
        /// Peer IP address
        #[arg(long)]
        address: IpAddr,
        /// Peer port (defaults to peer.port from the config)
        #[arg(long)]
        port: Option<u16>,
        /// Access token for the peer
        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Source root; a path on the source peer when --source-address is set
    #[arg(short, long)]
    pub source: String,

    /// Destination root; a path on the destination peer when
    /// --destination-address is set
    #[arg(short, long)]
    pub destination: String,

    /// Path under the source root to allow or block (repeatable)
    #[arg(short = 'e', long = "exception", value_name = "PATH")]
    pub exceptions: Vec<String>,

    /// How exceptions are read
    #[arg(long, default_value_t = ExceptionMode::Blocklist)]
    pub exception_mode: ExceptionMode,

    /// Source peer IP address
    #[arg(long)]
    pub source_address: Option<IpAddr>,

    /// Source peer port
    #[arg(long, requires = "source_address")]
    pub source_port: Option<u16>,

    /// Destination peer IP address
    #[arg(long)]
    pub destination_address: Option<IpAddr>,

    /// Destination peer port
    #[arg(long, requires = "destination_address")]
    pub destination_port: Option<u16>,

    /// Access token for remote peers (overrides peer.access_token)
    #[arg(long)]
    pub token: Option<String>,

    /// Apply every diff without asking
    #[arg(short = 'c', long)]
    pub skip_confirmation: bool,
}

/// Where one side of a sync lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Side {
    Local,
    Remote { address: IpAddr, port: Option<u16> },
}

impl Side {
    pub fn new(address: Option<IpAddr>, port: Option<u16>) -> Self {
        match address {
            Some(address) => Side::Remote { address, port },
            None => Side::Local,
        }
    }

    /// Parse a root or exception as addressed on this side.
    ///
    /// Local relative paths are resolved against `cwd`; remote paths are
    /// relative to the user's tree on the peer.
    pub fn path(&self, raw: &str, cwd: &Path) -> Result<SyncPath> {
        match self {
            Side::Remote { .. } => {
                let relative = RelativePath::new(raw)
                    .with_context(|| format!("Invalid peer path \"{}\"", raw))?;
                Ok(SyncPath::from(relative))
            }
            Side::Local => {
                let path = Path::new(raw);
                let resolved = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    let resolved = cwd.join(path);
                    tracing::info!("Resolved \"{}\" to {}", raw, resolved.display());
                    resolved
                };
                let absolute = AbsolutePath::new(&resolved)
                    .with_context(|| format!("Invalid local path \"{}\"", raw))?;
                Ok(SyncPath::from(absolute))
            }
        }
    }
}

impl SyncArgs {
    pub fn source_side(&self) -> Side {
        Side::new(self.source_address, self.source_port)
    }

    pub fn destination_side(&self) -> Side {
        Side::new(self.destination_address, self.destination_port)
    }
}
