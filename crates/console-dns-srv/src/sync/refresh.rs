//! Periodic catalogue refresh.
//!
//! Each refresh asks the configured sources in order for the catalogue,
//! sending the current version token. The first source that answers wins.
//! A new version replaces the snapshot in the [`ZoneStore`] and is then
//! written to the durable cache. When every source fails the current
//! snapshot keeps serving.

use console_dns_client::{ConsoleClient, ZoneListing};
use console_dns_core::ZoneSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{spawn_blocking, JoinHandle};
use tokio::time::{interval, timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{ZoneCache, ZoneSource};
use crate::config::ServerConfig;
use crate::store::ZoneStore;
use crate::SrvError;

const USER_AGENT: &str = concat!("console-dns-srv/", env!("CARGO_PKG_VERSION"));

/// What one refresh did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new catalogue version was published.
    Updated { source: String, zones: usize },
    /// The source reported the version already being served.
    Unchanged,
    /// Every source failed; the previous snapshot is still served.
    Failed,
}

/// Pulls catalogues from ordered sources into a [`ZoneStore`].
pub struct Refresher {
    store: Arc<ZoneStore>,
    sources: Vec<Arc<dyn ZoneSource>>,
    cache: Option<ZoneCache>,
    fetch_timeout: Duration,
}

impl Refresher {
    pub fn new(
        store: Arc<ZoneStore>,
        sources: Vec<Arc<dyn ZoneSource>>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            store,
            sources,
            cache: None,
            fetch_timeout,
        }
    }

    /// Persist accepted catalogues to `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: ZoneCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// One HTTP source per configured server, in configured order.
    pub fn from_config(config: &ServerConfig, store: Arc<ZoneStore>) -> crate::Result<Self> {
        let sources = config
            .servers
            .iter()
            .map(|server| {
                ConsoleClient::builder(server.as_str(), config.token.as_str())
                    .timeout(config.fetch_timeout())
                    .user_agent(USER_AGENT)
                    .build()
                    .map(|client| Arc::new(client) as Arc<dyn ZoneSource>)
                    .map_err(|e| SrvError::Config(format!("server {server}: {e}")))
            })
            .collect::<crate::Result<Vec<_>>>()?;

        let refresher = Self::new(store, sources, config.fetch_timeout());
        Ok(match &config.cache {
            Some(path) => refresher.with_cache(ZoneCache::new(path)),
            None => refresher,
        })
    }

    pub fn store(&self) -> &Arc<ZoneStore> {
        &self.store
    }

    /// Seed the store from the durable cache.
    ///
    /// Returns true if a cached catalogue was published. A missing or broken
    /// cache leaves the store as it is.
    pub fn load_cache(&self) -> bool {
        let Some(cache) = &self.cache else {
            return false;
        };

        match cache.load() {
            Ok(Some(zones)) => {
                info!(
                    path = %cache.path().display(),
                    zones = zones.len(),
                    etag = zones.etag(),
                    "loaded zone cache"
                );
                self.store.publish(Arc::new(zones));
                true
            }
            Ok(None) => {
                info!(path = %cache.path().display(), "no zone cache yet");
                false
            }
            Err(e) => {
                error!(path = %cache.path().display(), error = %e, "ignoring zone cache");
                false
            }
        }
    }

    /// Pull the catalogue once and publish it if it changed.
    pub async fn refresh(&self) -> RefreshOutcome {
        let current = self.store.current();
        let etag = current.etag();

        let (source, listing) = match self.fetch(etag).await {
            Ok(fetched) => fetched,
            Err(e) => {
                error!(error = %e, "zone refresh failed, serving previous snapshot");
                return RefreshOutcome::Failed;
            }
        };

        let zones = match listing {
            ZoneListing::NotModified => {
                debug!(source = %source, etag, "zone catalogue not modified");
                return RefreshOutcome::Unchanged;
            }
            ZoneListing::Modified(zones) => zones,
        };

        // Without a version token there is nothing to compare against.
        if zones.etag().is_some() && zones.etag() == etag {
            debug!(source = %source, etag, "zone catalogue unchanged");
            return RefreshOutcome::Unchanged;
        }

        let count = zones.len();
        let zones = Arc::new(zones);
        self.store.publish(Arc::clone(&zones));
        info!(
            source = %source,
            zones = count,
            etag = zones.etag(),
            names = ?zones.zone_names().collect::<Vec<_>>(),
            "zone catalogue updated"
        );

        self.persist(zones).await;

        RefreshOutcome::Updated {
            source,
            zones: count,
        }
    }

    /// Run [`Refresher::refresh`] now and then every `period` until `cancel`
    /// fires.
    ///
    /// Refreshes never overlap: a tick that comes due while a fetch is still
    /// running is skipped.
    pub fn spawn(self: Arc<Self>, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!(
                interval_secs = period.as_secs(),
                sources = self.sources.len(),
                "zone refresh task started"
            );

            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    () = cancel.cancelled() => break,
                    outcome = self.refresh() => debug!(?outcome, "zone refresh finished"),
                }
            }

            info!("zone refresh task shutting down");
        })
    }

    /// First listing any source returns, trying sources in order.
    async fn fetch(&self, etag: Option<&str>) -> crate::Result<(String, ZoneListing)> {
        let mut last_error = None;

        for source in &self.sources {
            match timeout(self.fetch_timeout, source.list_zones(etag)).await {
                Ok(Ok(listing)) => return Ok((source.name().to_owned(), listing)),
                Ok(Err(e)) => {
                    if e.is_auth_error() {
                        error!(
                            source = source.name(),
                            status = e.status_code(),
                            "catalogue source rejected the token"
                        );
                    } else {
                        warn!(
                            source = source.name(),
                            status = e.status_code(),
                            retryable = e.is_retryable(),
                            error = %e,
                            "zone fetch failed"
                        );
                    }
                    last_error = Some(format!("{}: {e}", source.name()));
                }
                Err(_) => {
                    warn!(
                        source = source.name(),
                        timeout_secs = self.fetch_timeout.as_secs_f64(),
                        "zone fetch timed out"
                    );
                    last_error = Some(format!("{}: timed out", source.name()));
                }
            }
        }

        Err(SrvError::Fetch(
            last_error.unwrap_or_else(|| "no catalogue sources configured".into()),
        ))
    }

    /// Write `zones` to the cache off the async workers.
    async fn persist(&self, zones: Arc<ZoneSet>) {
        let Some(cache) = self.cache.clone() else {
            return;
        };
        let path = cache.path().to_path_buf();
        match spawn_blocking(move || cache.save(&zones)).await {
            Ok(Ok(())) => debug!(path = %path.display(), "zone cache written"),
            Ok(Err(e)) => {
                error!(path = %path.display(), error = %e, "failed to write zone cache");
            }
            Err(e) => error!(path = %path.display(), error = %e, "zone cache writer panicked"),
        }
    }
}
