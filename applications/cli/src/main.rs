/// Mirra - one-way directory sync
mod args;
mod config;

use anyhow::{Context, Result};
use args::{Cli, Commands, Side, SyncArgs};
use clap::Parser;
use config::CliConfig;
use mirra_client::{ClientConfig, PeerClient, RemoteFileSystem};
use mirra_core::protocol::CLIENT_PROTOCOL_VERSION;
use mirra_core::FileSystem;
use mirra_fs::LocalFileSystem;
use mirra_sync::{SyncOutcome, Syncer, SyncerConfig};
use std::net::IpAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout is for prompts and results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mirra=info,mirra_sync=info,mirra_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Sync(args) => sync(args, &config).await,
        Commands::Handshake {
            address,
            port,
            token,
        } => handshake(address, port, token, &config).await,
    }
}

fn peer_client(
    address: IpAddr,
    port: Option<u16>,
    token: Option<&str>,
    config: &CliConfig,
) -> Result<PeerClient> {
    let token = token
        .or(config.peer.access_token.as_deref())
        .context("A remote peer needs an access token (--token or MIRRA_PEER__ACCESS_TOKEN)")?;

    let client_config = ClientConfig::for_peer(address, port.unwrap_or(config.peer.port))
        .access_token(token)
        .timeout(config.peer.timeout());
    Ok(PeerClient::new(client_config)?)
}

async fn file_system(
    side: &Side,
    token: Option<&str>,
    config: &CliConfig,
) -> Result<Arc<dyn FileSystem>> {
    match side {
        Side::Local => Ok(Arc::new(LocalFileSystem::new())),
        Side::Remote { address, port } => {
            let client = peer_client(*address, *port, token, config)?;
            let remote = RemoteFileSystem::connect(client)
                .await
                .with_context(|| format!("Failed to connect to peer {}", address))?;
            Ok(Arc::new(remote))
        }
    }
}

async fn sync(args: SyncArgs, config: &CliConfig) -> Result<()> {
    let cwd = std::env::current_dir().context("Cannot read the working directory")?;
    let source_side = args.source_side();
    let destination_side = args.destination_side();

    let source = source_side.path(&args.source, &cwd)?;
    let destination = destination_side.path(&args.destination, &cwd)?;
    let exceptions = args
        .exceptions
        .iter()
        .map(|raw| source_side.path(raw, &cwd))
        .collect::<Result<Vec<_>>>()?;

    let source_fs = file_system(&source_side, args.token.as_deref(), config).await?;
    let destination_fs = file_system(&destination_side, args.token.as_deref(), config).await?;

    let syncer_config = SyncerConfig::new(source, destination)
        .exceptions(exceptions, args.exception_mode)
        .skip_confirmation(args.skip_confirmation);
    let mut syncer = Syncer::new(syncer_config, source_fs, destination_fs)?;

    let summary = syncer.start_sync().await?;
    match summary.outcome {
        SyncOutcome::NoDiffs => println!("Already in sync"),
        SyncOutcome::NothingConfirmed => println!("Nothing confirmed, no changes made"),
        SyncOutcome::Applied => println!(
            "Synced: {} created, {} updated, {} deleted ({} ms)",
            summary.created, summary.updated, summary.deleted, summary.duration_ms
        ),
    }

    Ok(())
}

async fn handshake(
    address: IpAddr,
    port: Option<u16>,
    token: Option<String>,
    config: &CliConfig,
) -> Result<()> {
    let client = peer_client(address, port, token.as_deref(), config)?;
    let protocol = client.sync()?.handshake().await?;

    println!("Peer {} speaks protocol v{}", client.url(), protocol.version);
    if !protocol.compatible_previous_client_versions.is_empty() {
        println!(
            "Also accepts clients speaking: {:?}",
            protocol.compatible_previous_client_versions
        );
    }

    if protocol.accepts_client(CLIENT_PROTOCOL_VERSION) {
        println!("Compatible with this client (v{})", CLIENT_PROTOCOL_VERSION);
        Ok(())
    } else {
        anyhow::bail!(
            "Incompatible: this client speaks v{}",
            CLIENT_PROTOCOL_VERSION
        )
    }
}
