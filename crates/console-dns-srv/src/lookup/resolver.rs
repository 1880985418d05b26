//! Zone selection and record key fallback.

use console_dns_core::{Zone, ZoneSet, APEX, WILDCARD};
use hickory_proto::rr::RecordType;
use tracing::debug;

use super::{record_kind, LookupError, Resolution};

/// Find the zone and record key that answer `qname` for `rtype`.
///
/// The owning zone is the first configured suffix found while peeling one
/// leading label at a time, so the most specific zone wins. A name equal to
/// a configured zone always resolves at that zone's apex. Inside the zone
/// the key is tried as is, then as a single-level wildcard, then at the
/// apex; a tier only counts if it holds an entry of the requested type.
pub fn resolve(zones: &ZoneSet, qname: &str, rtype: RecordType) -> Result<Resolution, LookupError> {
    let name = normalize(qname);

    let Some((zone, key)) = locate(zones, &name) else {
        debug!(name = %name, "no zone owns query name");
        return Err(LookupError::ZoneNotFound { name });
    };

    if let Some(kind) = record_kind(rtype) {
        let wildcard = wildcard_key(&key);
        for candidate in [key.as_str(), wildcard.as_str(), APEX] {
            if zone.record(candidate).is_some_and(|r| r.has(kind)) {
                debug!(zone = zone.name(), key = candidate, %rtype, "resolved");
                return Ok(Resolution {
                    zone: zone.name().to_owned(),
                    key: candidate.to_owned(),
                    kind,
                });
            }
        }
    }

    debug!(zone = zone.name(), key = %key, %rtype, "no record of requested type");
    Err(LookupError::RecordNotFound {
        key: APEX.to_owned(),
    })
}

/// Owning zone and initial record key for a normalized name.
fn locate<'z>(zones: &'z ZoneSet, name: &str) -> Option<(&'z Zone, String)> {
    if let Some(zone) = zones.zone(name) {
        return Some((zone, APEX.to_owned()));
    }
    name.match_indices('.').find_map(|(dot, _)| {
        zones
            .zone(&name[dot + 1..])
            .map(|zone| (zone, name[..dot].to_owned()))
    })
}

/// `foo.bar` → `*.bar`, `foo` → `*`.
fn wildcard_key(key: &str) -> String {
    match key.split_once('.') {
        Some((_, rest)) => format!("{WILDCARD}.{rest}"),
        None => WILDCARD.to_owned(),
    }
}

fn normalize(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase()
}
