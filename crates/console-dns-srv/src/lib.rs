//! console-dns-srv: authoritative DNS over a pull-refreshed zone catalogue.
//!
//! Zones live in a remote catalogue service. A background task pulls the
//! whole catalogue on an interval, swaps it into a [`ZoneStore`] and keeps a
//! durable copy on disk. Queries resolve against whichever snapshot is
//! current when they arrive.
//!
//! # Resolution
//!
//! - **Zone**: the longest configured suffix of the query name owns it; a
//!   name equal to a zone is answered at that zone's apex.
//! - **Record**: the exact key, then a single-level wildcard (`*.rest`), then
//!   the apex (`@`). A tier only counts if it holds the requested type.
//! - **Answer**: one record per stored entry, owned by the query name. NS, MX
//!   and SRV carry A/AAAA glue from the same snapshot.
//!
//! Names no zone owns are passed to the next handler; names a zone owns but
//! cannot answer get an authoritative empty response.

pub mod config;
pub mod error;
pub mod handler;
pub mod lookup;
pub mod server;
pub mod store;
pub mod sync;

#[cfg(test)]
mod testing;

// Re-exports for convenience.
pub use config::{LogLevel, ServerConfig};
pub use error::SrvError;
pub use handler::{dispatch, ConsoleHandler, Dispatch};
pub use store::ZoneStore;
pub use sync::{RefreshOutcome, Refresher, ZoneCache, ZoneSource};

/// Result type for console-dns-srv operations.
pub type Result<T> = std::result::Result<T, SrvError>;
