/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "mirra-server.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Each user's tree lives in `<root_path>/<user id>`
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Staged uploads waiting to be moved into a user's tree
    #[serde(default = "default_uploads_path")]
    pub uploads_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `mirra-server.toml` in the working directory and is
    /// skipped when missing. `MIRRA_SERVER_*` variables override the file,
    /// e.g. `MIRRA_SERVER_AUTH__JWT_SECRET`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MIRRA_SERVER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set MIRRA_SERVER_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        let root = &self.storage.root_path;
        let uploads = &self.storage.uploads_path;
        if root.starts_with(uploads) || uploads.starts_with(root) {
            return Err(ServerError::Config(format!(
                "Storage root {:?} and uploads path {:?} must not contain each other",
                root, uploads
            )));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        root_path: default_root_path(),
        uploads_path: default_uploads_path(),
    }
}

fn default_root_path() -> PathBuf {
    PathBuf::from("./data/users")
}

fn default_uploads_path() -> PathBuf {
    PathBuf::from("./data/uploads")
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24 * 30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.auth.jwt_secret = "secret".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.jwt_expiration_hours, 720);
        assert!(config.validate().is_err());
        assert!(with_secret().validate().is_ok());
    }

    #[test]
    fn test_rejects_nested_storage_paths() {
        let mut config = with_secret();
        config.storage.uploads_path = config.storage.root_path.join("uploads");
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        let mut config = with_secret();
        config.storage.uploads_path = config.storage.root_path.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("peer.toml");
        std::fs::write(
            &file,
            "[server]\nport = 9191\n\n[storage]\nroot_path = \"/srv/mirra/users\"\nuploads_path = \"/srv/mirra/uploads\"\n\n[auth]\njwt_secret = \"from-file\"\n",
        )
        .unwrap();

        let config = ServerConfig::load(Some(&file)).unwrap();
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.root_path, PathBuf::from("/srv/mirra/users"));
        assert_eq!(config.auth.jwt_secret, "from-file");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = ServerConfig::load(Some(Path::new("/nonexistent/mirra.toml"))).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
