//! Keeping the zone snapshot current.
//!
//! - **Source**: a catalogue endpoint ([`ZoneSource`]), implemented by the
//!   HTTP client.
//! - **Cache**: the durable copy of the last accepted catalogue.
//! - **Refresh**: the periodic pull that ties sources, cache and store together.

pub mod cache;
pub mod refresh;
pub mod source;

pub use cache::ZoneCache;
pub use refresh::{RefreshOutcome, Refresher};
pub use source::ZoneSource;
