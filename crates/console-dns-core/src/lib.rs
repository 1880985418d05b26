//! Core types for console-dns.
//!
//! This crate holds the zone catalogue model shared by the client and the
//! server:
//!
//! - **Types**: [`ZoneSet`], [`Zone`], [`Record`] and the per-type entries,
//!   plus [`RecordKind`] for the nine supported record types
//! - **Errors**: [`ConsoleError`] for catalogue service failures
//!
//! A [`ZoneSet`] is an immutable snapshot. It deserializes from the same JSON
//! document the catalogue service returns and the durable cache stores.
//!
//! # Example
//!
//! ```rust
//! use console_dns_core::{Record, RecordA, RecordKind, Zone, ZoneSet};
//!
//! let zones = ZoneSet::new([Zone::new("example.com").with_record(
//!     "www",
//!     Record {
//!         a: vec![RecordA { ip: "1.2.3.4".parse().unwrap(), ttl: 300 }],
//!         ..Default::default()
//!     },
//! )]);
//!
//! let www = zones.zone("example.com").and_then(|z| z.record("www")).unwrap();
//! assert!(www.has(RecordKind::A));
//! ```

mod error;
pub mod types;

pub use error::{ConsoleError, Result};
pub use types::*;
