//! Shared holder of the current zone snapshot.

use arc_swap::ArcSwap;
use console_dns_core::ZoneSet;
use std::sync::Arc;

/// Current zone snapshot, readable from any number of query tasks.
///
/// Readers never block: each takes one `Arc<ZoneSet>` and resolves against
/// it for the whole query. The refresh task is the only writer.
#[derive(Debug)]
pub struct ZoneStore {
    current: ArcSwap<ZoneSet>,
}

impl ZoneStore {
    pub fn new(zones: ZoneSet) -> Self {
        Self {
            current: ArcSwap::from_pointee(zones),
        }
    }

    /// Snapshot to resolve one query against.
    pub fn current(&self) -> Arc<ZoneSet> {
        self.current.load_full()
    }

    /// Version token of the current snapshot.
    pub fn etag(&self) -> Option<String> {
        self.current.load().etag().map(String::from)
    }

    /// Replace the snapshot, returning the one it replaced.
    pub fn publish(&self, zones: Arc<ZoneSet>) -> Arc<ZoneSet> {
        self.current.swap(zones)
    }
}

impl Default for ZoneStore {
    fn default() -> Self {
        Self::new(ZoneSet::empty())
    }
}
