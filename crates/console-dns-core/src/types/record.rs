use serde::{Deserialize, Deserializer, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

use super::RecordKind;

/// All typed entries stored under one record key
///
/// A record may hold several types at once (for example the zone apex
/// usually carries SOA, NS and MX together).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// IPv4 addresses
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub a: Vec<RecordA>,

    /// IPv6 addresses
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub aaaa: Vec<RecordAaaa>,

    /// Text values
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub txt: Vec<RecordTxt>,

    /// Alias targets
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub cname: Vec<RecordCname>,

    /// Delegated name servers
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub ns: Vec<RecordNs>,

    /// Mail exchangers
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub mx: Vec<RecordMx>,

    /// Service locators
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub srv: Vec<RecordSrv>,

    /// CA authorization policies
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub caa: Vec<RecordCaa>,

    /// Start of authority, only meaningful at the zone apex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soa: Option<RecordSoa>,
}

type Presence = fn(&Record) -> bool;

// Indexed by `RecordKind` discriminant.
const PRESENCE: [Presence; RecordKind::COUNT] = [
    |r| !r.a.is_empty(),
    |r| !r.aaaa.is_empty(),
    |r| !r.txt.is_empty(),
    |r| !r.cname.is_empty(),
    |r| !r.ns.is_empty(),
    |r| !r.mx.is_empty(),
    |r| !r.srv.is_empty(),
    |r| !r.caa.is_empty(),
    |r| r.soa.is_some(),
];

impl Record {
    /// Returns true if at least one entry of `kind` is stored here
    #[must_use]
    pub fn has(&self, kind: RecordKind) -> bool {
        PRESENCE[kind.index()](self)
    }

    /// Kinds with at least one entry
    pub fn kinds(&self) -> impl Iterator<Item = RecordKind> + '_ {
        RecordKind::ALL.into_iter().filter(|kind| self.has(*kind))
    }

    /// Returns true if no entry of any kind is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds().next().is_none()
    }
}

/// IPv4 address entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordA {
    /// Address
    pub ip: Ipv4Addr,
    /// Time to live in seconds
    #[serde(default)]
    pub ttl: u32,
}

/// IPv6 address entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAaaa {
    /// Address
    pub ip: Ipv6Addr,
    /// Time to live in seconds
    #[serde(default)]
    pub ttl: u32,
}

/// Text entry of arbitrary length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTxt {
    /// Text value, split into 255-byte strings on the wire
    pub text: String,
    /// Time to live in seconds
    #[serde(default)]
    pub ttl: u32,
}

/// Alias entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCname {
    /// Canonical target host
    pub host: String,
    /// Time to live in seconds
    #[serde(default)]
    pub ttl: u32,
}

/// Name server entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordNs {
    /// Name server host
    pub host: String,
    /// Time to live in seconds
    #[serde(default)]
    pub ttl: u32,
}

/// Mail exchanger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMx {
    /// Exchanger host
    pub host: String,
    /// Preference, lower is preferred
    #[serde(default)]
    pub preference: u16,
    /// Time to live in seconds
    #[serde(default)]
    pub ttl: u32,
}

/// Service locator entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSrv {
    /// Target host
    pub target: String,
    /// Priority, lower is tried first
    #[serde(default)]
    pub priority: u16,
    /// Relative weight among equal priorities
    #[serde(default)]
    pub weight: u16,
    /// Service port
    #[serde(default)]
    pub port: u16,
    /// Time to live in seconds
    #[serde(default)]
    pub ttl: u32,
}

/// CA authorization entry. Carries no TTL of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCaa {
    /// Flags octet (bit 7 is issuer-critical)
    #[serde(default)]
    pub flag: u8,
    /// Property tag, e.g. `issue`, `issuewild`, `iodef`
    pub tag: String,
    /// Property value
    #[serde(default)]
    pub value: String,
}

/// Start of authority entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSoa {
    /// Primary name server
    pub mname: String,
    /// Responsible mailbox, in domain form
    pub rname: String,
    /// Zone serial
    #[serde(default)]
    pub serial: u32,
    /// Secondary refresh interval
    #[serde(default)]
    pub refresh: u32,
    /// Secondary retry interval
    #[serde(default)]
    pub retry: u32,
    /// Secondary expiry
    #[serde(default)]
    pub expire: u32,
    /// Negative caching TTL
    #[serde(default)]
    pub minimum: u32,
    /// Time to live in seconds
    #[serde(default)]
    pub ttl: u32,
}

/// Accepts `null` wherever a list is expected. Catalogue services written in
/// Go encode empty slices as `null`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_per_kind() {
        let record = Record {
            txt: vec![RecordTxt {
                text: "hello".into(),
                ttl: 60,
            }],
            soa: Some(RecordSoa {
                mname: "ns1.example.com".into(),
                rname: "admin.example.com".into(),
                serial: 1,
                refresh: 3600,
                retry: 900,
                expire: 604_800,
                minimum: 300,
                ttl: 3600,
            }),
            ..Default::default()
        };

        assert!(record.has(RecordKind::Txt));
        assert!(record.has(RecordKind::Soa));
        assert!(!record.has(RecordKind::A));
        assert!(!record.has(RecordKind::Caa));
        assert_eq!(
            record.kinds().collect::<Vec<_>>(),
            vec![RecordKind::Txt, RecordKind::Soa]
        );
    }

    #[test]
    fn test_each_kind_reads_its_own_field() {
        let full: Record = serde_json::from_str(
            r#"{
                "a": [{"ip": "1.2.3.4", "ttl": 1}],
                "aaaa": [{"ip": "::1", "ttl": 1}],
                "txt": [{"text": "t", "ttl": 1}],
                "cname": [{"host": "c.example.com", "ttl": 1}],
                "ns": [{"host": "ns.example.com", "ttl": 1}],
                "mx": [{"host": "mx.example.com", "preference": 10, "ttl": 1}],
                "srv": [{"target": "s.example.com", "priority": 1, "weight": 2, "port": 3, "ttl": 1}],
                "caa": [{"flag": 0, "tag": "issue", "value": "ca.example"}],
                "soa": {"mname": "ns", "rname": "admin", "serial": 1}
            }"#,
        )
        .unwrap();

        for kind in RecordKind::ALL {
            assert!(full.has(kind), "{kind} should be present");

            // Strip exactly this kind and make sure only it disappears.
            let mut without = full.clone();
            match kind {
                RecordKind::A => without.a.clear(),
                RecordKind::Aaaa => without.aaaa.clear(),
                RecordKind::Txt => without.txt.clear(),
                RecordKind::Cname => without.cname.clear(),
                RecordKind::Ns => without.ns.clear(),
                RecordKind::Mx => without.mx.clear(),
                RecordKind::Srv => without.srv.clear(),
                RecordKind::Caa => without.caa.clear(),
                RecordKind::Soa => without.soa = None,
            }
            assert!(!without.has(kind));
            assert_eq!(without.kinds().count(), RecordKind::COUNT - 1);
        }
    }

    #[test]
    fn test_null_lists_deserialize_as_empty() {
        let record: Record =
            serde_json::from_str(r#"{"a": null, "txt": [{"text": "x", "ttl": 5}]}"#).unwrap();
        assert!(record.a.is_empty());
        assert_eq!(record.txt.len(), 1);
        assert!(!record.is_empty());
    }

    #[test]
    fn test_empty_lists_are_not_serialized() {
        let record = Record {
            a: vec![RecordA {
                ip: Ipv4Addr::new(1, 2, 3, 4),
                ttl: 300,
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"a":[{"ip":"1.2.3.4","ttl":300}]}"#);
    }
}
