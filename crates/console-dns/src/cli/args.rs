//! Command-line argument definitions using clap.

use clap::Parser;
use console_dns_srv::{LogLevel, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Authoritative DNS server for console-dns zone catalogues
///
/// Pulls the zone catalogue from one or more console-dns services and answers
/// queries for every zone in it. Flags override values from the config file.
#[derive(Parser, Debug)]
#[command(name = "console-dns")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, env = "CONSOLE_DNS_CONFIG", default_value = "console-dns.toml")]
    pub config: PathBuf,

    /// UDP/TCP listen address (e.g. 0.0.0.0:53)
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,

    /// Catalogue service URL; repeat to add failover servers in order
    #[arg(short, long = "server", value_name = "URL")]
    pub servers: Vec<String>,

    /// Catalogue service token (or set CONSOLE_DNS_TOKEN)
    #[arg(short, long, env = "CONSOLE_DNS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Durable cache file for the last fetched catalogue
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Log level: debug, info or error
    #[arg(long)]
    pub log: Option<LogLevel>,
}

impl Cli {
    /// Overlay command-line values onto a loaded config.
    pub fn apply(self, config: &mut ServerConfig) {
        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if !self.servers.is_empty() {
            config.servers = self.servers;
        }
        if let Some(token) = self.token {
            config.token = token;
        }
        if let Some(cache) = self.cache {
            config.cache = Some(cache);
        }
        if let Some(log) = self.log {
            config.log = log;
        }
    }
}
