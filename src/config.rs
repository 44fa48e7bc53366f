//! Startup configuration.
//!
//! Values come from built-in defaults, then an optional YAML file named by
//! `WEBROOT_CONFIG`, then individual environment overrides:
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 50500
//!   root_directory: /var/www
//! log_level: info
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_PATH_ENV: &str = "WEBROOT_CONFIG";
pub const HOST_ENV: &str = "WEBROOT_HOST";
pub const PORT_ENV: &str = "WEBROOT_PORT";
pub const ROOT_ENV: &str = "WEBROOT_ROOT";
pub const LOG_ENV: &str = "WEBROOT_LOG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// One of trace, debug, info, warn, error
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Must be above 1024 and below 65535
    pub port: u16,
    /// Directory every request target is resolved under
    pub root_directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50500,
            root_directory: PathBuf::from("./www"),
        }
    }
}

impl Config {
    /// Loads, applies environment overrides and validates.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Applies the `WEBROOT_*` overrides found by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV) {
            self.server.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .parse()
                .with_context(|| format!("{} is not a valid port: {:?}", PORT_ENV, port))?;
        }
        if let Some(root) = lookup(ROOT_ENV) {
            self.server.root_directory = PathBuf::from(root);
        }
        if let Some(level) = lookup(LOG_ENV) {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let port = self.server.port;
        if port <= 1024 || port == u16::MAX {
            anyhow::bail!("port must be greater than 1024 and less than 65535, got {}", port);
        }
        if self.server.root_directory.as_os_str().is_empty() {
            anyhow::bail!("root_directory must not be empty");
        }
        self.log_level()?;
        Ok(())
    }

    /// Address the listener binds to, as `host:port`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn log_level(&self) -> anyhow::Result<tracing::Level> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("unknown log level {:?}", self.log_level))
    }
}
