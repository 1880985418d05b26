//! Query resolution against a zone snapshot.
//!
//! - **Resolver**: picks the owning zone and the record key that answers a
//!   (name, type) pair, falling back exact key → wildcard → apex.
//! - **Answer**: turns a resolution into hickory resource records, with glue
//!   for referral types.

pub mod answer;
pub mod resolver;

pub use answer::{build, split_txt, Answer};
pub use resolver::resolve;

use console_dns_core::RecordKind;
use hickory_proto::rr::RecordType;
use thiserror::Error;

/// Why a query could not be resolved to a record.
///
/// Both variants are normal outcomes at the query boundary, not failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No configured zone owns the name.
    #[error("no zone configured for {name}")]
    ZoneNotFound { name: String },

    /// A zone owns the name but no fallback tier holds the requested type.
    #[error("no matching record, last key tried: {key}")]
    RecordNotFound { key: String },
}

/// Where the answer to a query lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Normalized name of the owning zone.
    pub zone: String,
    /// Record key inside the zone holding the answer.
    pub key: String,
    /// Requested record type.
    pub kind: RecordKind,
}

/// Map a wire record type onto a catalogue kind.
pub const fn record_kind(rtype: RecordType) -> Option<RecordKind> {
    match rtype {
        RecordType::A => Some(RecordKind::A),
        RecordType::AAAA => Some(RecordKind::Aaaa),
        RecordType::TXT => Some(RecordKind::Txt),
        RecordType::CNAME => Some(RecordKind::Cname),
        RecordType::NS => Some(RecordKind::Ns),
        RecordType::MX => Some(RecordKind::Mx),
        RecordType::SRV => Some(RecordKind::Srv),
        RecordType::CAA => Some(RecordKind::Caa),
        RecordType::SOA => Some(RecordKind::Soa),
        _ => None,
    }
}
