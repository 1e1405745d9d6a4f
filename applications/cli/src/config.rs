/// CLI configuration
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "mirra.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub peer: PeerSettings,
}

/// Defaults for talking to remote peers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PeerSettings {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl PeerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PeerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

impl CliConfig {
    /// Load `mirra.toml` (or `path`) and apply `MIRRA_*` overrides such as
    /// `MIRRA_PEER__ACCESS_TOKEN`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path.clone()));
        } else if path.is_some() {
            anyhow::bail!("Config file not found: {}", config_path.display());
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MIRRA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        settings
            .build()
            .and_then(|config| config.try_deserialize::<Self>())
            .with_context(|| format!("Invalid configuration ({})", config_path.display()))
    }
}
