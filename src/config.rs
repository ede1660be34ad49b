//! Server configuration.
//!
//! Loaded from an optional YAML file, then overridden from the environment.
//! Every field has a default, so running with no file at all serves
//! `./webroot` on `127.0.0.1:10000`.
//!
//! ```yaml
//! server:
//!   address: 127.0.0.1
//!   port: 10000
//!   backlog: 16
//!   max_header_bytes: 8192
//!   read_timeout_secs: 30
//! document_root: webroot
//! log_level: info
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Path of the YAML file, used when none is passed on the command line.
pub const CONFIG_ENV: &str = "LANTERN_CONFIG";
pub const ADDRESS_ENV: &str = "LANTERN_ADDRESS";
pub const PORT_ENV: &str = "LANTERN_PORT";
pub const ROOT_ENV: &str = "LANTERN_ROOT";
pub const LOG_ENV: &str = "LANTERN_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    /// Directory all content is served from. Relative paths resolve
    /// against the working directory.
    pub document_root: PathBuf,
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// IP address to bind, v4 or v6.
    pub address: String,
    pub port: u16,
    /// Listen backlog, at least 1.
    pub backlog: u32,
    /// Largest header block accepted before answering 413.
    pub max_header_bytes: usize,
    /// How long a client gets to deliver its header block.
    pub read_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            document_root: PathBuf::from("webroot"),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 10000,
            backlog: 16,
            max_header_bytes: 8192,
            read_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Loads configuration the way the binary does.
    ///
    /// `path` wins over `LANTERN_CONFIG`; with neither the defaults are used.
    /// Environment overrides apply last.
    pub fn load(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut cfg = match path {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };

        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not to a struct
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies `LANTERN_*` overrides read through `lookup`.
    ///
    /// Taking the lookup as a closure keeps tests away from the real
    /// process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup(ADDRESS_ENV) {
            self.server.address = address;
        }

        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .parse()
                .with_context(|| format!("{PORT_ENV}={port} is not a valid port"))?;
        }

        if let Some(root) = lookup(ROOT_ENV) {
            self.document_root = PathBuf::from(root);
        }

        if let Some(level) = lookup(LOG_ENV) {
            self.log_level = level;
        }

        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.server.socket_addr()?;
        self.log_level()?;

        if self.server.backlog == 0 {
            anyhow::bail!("server.backlog must be at least 1");
        }
        if self.server.max_header_bytes == 0 {
            anyhow::bail!("server.max_header_bytes must be greater than 0");
        }
        if self.server.read_timeout_secs == 0 {
            anyhow::bail!("server.read_timeout_secs must be greater than 0");
        }

        Ok(())
    }

    pub fn log_level(&self) -> anyhow::Result<tracing::Level> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("unknown log level {:?}", self.log_level))
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .address
            .parse()
            .with_context(|| format!("server.address {:?} is not an IP address", self.address))?;

        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}
