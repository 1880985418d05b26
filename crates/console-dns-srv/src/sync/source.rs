//! Where zone catalogues come from.

use async_trait::async_trait;
use console_dns_client::{ConsoleClient, ZoneListing};

/// One catalogue endpoint the refresh pipeline can pull from.
#[async_trait]
pub trait ZoneSource: Send + Sync {
    /// Label used in logs.
    fn name(&self) -> &str;

    /// Fetch the full catalogue, or learn that `if_none_match` is current.
    async fn list_zones(
        &self,
        if_none_match: Option<&str>,
    ) -> console_dns_core::Result<ZoneListing>;
}

#[async_trait]
impl ZoneSource for ConsoleClient {
    fn name(&self) -> &str {
        self.server()
    }

    async fn list_zones(
        &self,
        if_none_match: Option<&str>,
    ) -> console_dns_core::Result<ZoneListing> {
        self.zones().list(if_none_match).await
    }
}
