/// Mirra Server - a peer other machines can sync with
use clap::{Parser, Subcommand};
use mirra_server::{
    config::ServerConfig,
    create_router,
    services::{storage::user_directory, AuthService, PeerStorage},
    state::AppState,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mirra-server")]
#[command(about = "Mirra peer serving per-user directory trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print an access token for a user
    IssueToken {
        /// User ID, also the name of the user's directory
        #[arg(short, long)]
        user_id: String,
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mirra_server=info,mirra_fs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::IssueToken { user_id, config } => {
            issue_token(&user_id, config)?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Mirra Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let storage = PeerStorage::new(&config.storage.root_path, &config.storage.uploads_path)?;
    storage.initialize().await?;
    tracing::info!(
        "Serving user trees from {} (uploads staged in {})",
        storage.root(),
        storage.uploads()
    );

    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    ));
    tracing::info!("Auth service initialized");

    let app_state = AppState::new(auth_service, Arc::new(storage));
    let app = create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn issue_token(user_id: &str, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;
    user_directory(user_id)?;

    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    );
    let token = auth_service.create_access_token(user_id)?;

    tracing::info!(
        "Issued token for {} (valid {} hours)",
        user_id,
        config.auth.jwt_expiration_hours
    );
    println!("{}", token);

    Ok(())
}
