//! Server configuration for console-dns nodes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::SrvError;

/// Configuration for a console-dns authoritative node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// UDP/TCP listen address (default: 0.0.0.0:5353).
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Catalogue service endpoints, tried in this order on every refresh.
    #[serde(default)]
    pub servers: Vec<String>,

    /// Bearer token for the catalogue services.
    #[serde(default)]
    pub token: String,

    /// Durable cache file for the last accepted catalogue.
    #[serde(default)]
    pub cache: Option<PathBuf>,

    /// Log verbosity.
    #[serde(default)]
    pub log: LogLevel,

    /// How often to poll the catalogue (seconds).
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Upper bound on one fetch attempt against one endpoint (seconds).
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

/// Log verbosity accepted in the config file and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = SrvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "error" => Ok(Self::Error),
            other => Err(SrvError::Config(format!(
                "unknown log level {other:?} (expected debug, info or error)"
            ))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            servers: Vec::new(),
            token: String::new(),
            cache: None,
            log: LogLevel::default(),
            refresh_interval_secs: default_refresh_interval(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl ServerConfig {
    /// Load config from a TOML file, falling back to defaults.
    ///
    /// The result is not validated; callers apply their overrides first and
    /// then call [`ServerConfig::validate`].
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| SrvError::Config(e.to_string()))
    }

    /// Reject configurations the node cannot start with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.servers.is_empty() {
            return Err(SrvError::Config(
                "at least one catalogue server is required".into(),
            ));
        }
        for server in &self.servers {
            Url::parse(server)
                .map_err(|e| SrvError::Config(format!("invalid server url {server:?}: {e}")))?;
        }
        if self.token.trim().is_empty() {
            return Err(SrvError::Config("token must not be empty".into()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(SrvError::Config(
                "refresh_interval_secs must be positive".into(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(SrvError::Config("fetch_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

// Default value functions for serde.
const fn default_listen() -> SocketAddr {
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 5353)
}

const fn default_refresh_interval() -> u64 {
    10
}

const fn default_fetch_timeout() -> u64 {
    5
}
