//! Global `tracing` subscriber setup.

use console_dns_srv::LogLevel;
use std::io::stderr;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    registry()
        .with(filter)
        .with(fmt::layer().with_writer(stderr))
        .init();
}

/// Our crates at `level`, everything else at errors only.
fn default_directives(level: LogLevel) -> String {
    format!("error,console_dns={level},console_dns_srv={level},console_dns_client={level}")
}
