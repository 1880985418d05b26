//! Zone catalogue endpoints.

use crate::client::Versioned;
use crate::ConsoleClient;
use console_dns_core::{Result, ZoneSet};
use tracing::debug;

const ZONES_PATH: &str = "/api/v1/zones";

/// Outcome of a conditional catalogue listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneListing {
    /// A full catalogue, tagged with the response's `ETag`
    Modified(ZoneSet),
    /// The catalogue still matches the version token that was sent
    NotModified,
}

/// Zone catalogue endpoints
pub struct ZonesApi<'a> {
    client: &'a ConsoleClient,
}

impl<'a> ZonesApi<'a> {
    pub(crate) const fn new(client: &'a ConsoleClient) -> Self {
        Self { client }
    }

    /// List every zone with all of its records
    ///
    /// When `if_none_match` is set the service may answer
    /// [`ZoneListing::NotModified`] instead of sending the catalogue again.
    /// The version token of a returned catalogue comes from the `ETag`
    /// response header, never from the body.
    pub async fn list(&self, if_none_match: Option<&str>) -> Result<ZoneListing> {
        match self.client.get_versioned(ZONES_PATH, if_none_match).await? {
            Versioned::NotModified => Ok(ZoneListing::NotModified),
            Versioned::Modified { body, etag } => {
                let zones = ZoneSet::from_json(&body)?.with_etag(etag);
                debug!(
                    server = %self.client.server(),
                    zones = zones.len(),
                    etag = zones.etag(),
                    "listed zones"
                );
                Ok(ZoneListing::Modified(zones))
            }
        }
    }
}
