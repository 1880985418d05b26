//! CLI argument parsing and server startup.

pub mod args;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use console_dns_srv::{server, ConsoleHandler, Refresher, ServerConfig, ZoneStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::logging;

/// Run the server until Ctrl-C.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration, then let flags and environment override it
    let config_path = cli.config.clone();
    let mut config = ServerConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    cli.apply(&mut config);
    config.validate()?;

    logging::init(config.log);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        servers = ?config.servers,
        "starting console-dns"
    );

    let store = Arc::new(ZoneStore::default());
    let refresher = Arc::new(Refresher::from_config(&config, Arc::clone(&store))?);
    refresher.load_cache();

    let cancel = CancellationToken::new();
    let refresh_task = Arc::clone(&refresher).spawn(config.refresh_interval(), cancel.clone());
    spawn_signal_handler(cancel.clone());

    let served = server::run(config.listen, ConsoleHandler::new(store), cancel.clone()).await;

    cancel.cancel();
    refresh_task.await.context("zone refresh task panicked")?;
    served?;

    info!("console-dns stopped");
    Ok(())
}

fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl-C, shutting down");
                cancel.cancel();
            }
            Err(e) => error!(error = %e, "failed to listen for Ctrl-C"),
        }
    });
}
