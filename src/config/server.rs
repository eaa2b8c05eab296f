//! Server settings loaded from config.toml and the environment.
//!
//! Every setting has a default, so the file is optional. Environment variables
//! (`HOST`, `PORT`, `PUBLIC_DIR`) take precedence over values from the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory served as static files; uploads are written below it
    pub public_dir: PathBuf,
    /// Largest accepted request body for image uploads, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            public_dir: PathBuf::from("public"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Socket address built from `host` and `port`.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config {
                message: format!("Invalid bind address {}:{}: {e}", self.host, self.port),
            })
    }

    /// Overrides settings with `HOST`, `PORT` and `PUBLIC_DIR` when they are set.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.port = port.parse().map_err(|e| Error::Config {
                message: format!("Invalid PORT value '{port}': {e}"),
            })?;
        }
        if let Ok(dir) = std::env::var("PUBLIC_DIR") {
            self.public_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML syntax is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads server settings from `./config.toml` if present, then applies environment overrides.
pub fn load_server_config() -> Result<ServerConfig> {
    let path = Path::new("config.toml");
    let mut server = if path.exists() {
        debug!("Loading configuration from {:?}", path);
        load_config(path)?.server
    } else {
        info!("No config.toml found, using default server settings");
        ServerConfig::default()
    };
    server.apply_env_overrides()?;
    Ok(server)
}
