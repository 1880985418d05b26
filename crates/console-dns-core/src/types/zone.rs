use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::Record;

/// Record key of the zone apex
pub const APEX: &str = "@";

/// Record key of a bare single-level wildcard
pub const WILDCARD: &str = "*";

/// One zone from the catalogue: an owning name and its records
///
/// Record keys are relative to the zone name (`www`, `*.dev`, `@`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone name, filled in from the catalogue map key
    #[serde(skip)]
    name: String,

    #[serde(default)]
    records: BTreeMap<String, Record>,
}

impl Zone {
    /// Create an empty zone
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: normalize(name.as_ref()),
            records: BTreeMap::new(),
        }
    }

    /// Add or replace the record stored under `key`
    #[must_use]
    pub fn with_record(mut self, key: impl AsRef<str>, record: Record) -> Self {
        self.records.insert(normalize(key.as_ref()), record);
        self
    }

    /// Zone name, lowercase and without a trailing dot
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record stored under `key`, if any
    #[must_use]
    pub fn record(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    /// The apex record, if any
    #[must_use]
    pub fn apex(&self) -> Option<&Record> {
        self.record(APEX)
    }

    /// Number of record keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the zone holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keys equal after normalization keep the entry whose original key
    /// sorts last.
    fn normalized(mut self, name: &str) -> Self {
        self.name = normalize(name);
        let mut records = BTreeMap::new();
        for (key, record) in std::mem::take(&mut self.records) {
            if records.insert(normalize(&key), record).is_some() {
                warn!(zone = %self.name, key = %key, "duplicate record key after normalization, keeping this one");
            }
        }
        self.records = records;
        self
    }
}

/// An immutable snapshot of the whole zone catalogue
///
/// Carries the version token (`ETag`) of the catalogue it was built from.
/// A refresh never edits a `ZoneSet`; it builds a new one and swaps it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ZoneSetDocument")]
pub struct ZoneSet {
    /// Catalogue version token
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,

    zones: BTreeMap<String, Zone>,
}

/// Wire shape of a catalogue document, before name normalization
#[derive(Deserialize)]
struct ZoneSetDocument {
    #[serde(default)]
    etag: Option<String>,
    #[serde(default)]
    zones: Option<BTreeMap<String, Zone>>,
}

/// Zone names equal after normalization keep the zone whose original name
/// sorts last.
impl From<ZoneSetDocument> for ZoneSet {
    fn from(doc: ZoneSetDocument) -> Self {
        let mut zones = BTreeMap::new();
        for (name, zone) in doc.zones.unwrap_or_default() {
            let zone = zone.normalized(&name);
            if zones.insert(zone.name.clone(), zone).is_some() {
                warn!(zone = %name, "duplicate zone name after normalization, keeping this one");
            }
        }
        Self {
            etag: doc.etag,
            zones,
        }
    }
}

impl ZoneSet {
    /// Build a snapshot from zones, keyed by each zone's name
    #[must_use]
    pub fn new(zones: impl IntoIterator<Item = Zone>) -> Self {
        Self {
            etag: None,
            zones: zones
                .into_iter()
                .map(|zone| (zone.name.clone(), zone))
                .collect(),
        }
    }

    /// An empty snapshot with no version token
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach a catalogue version token
    #[must_use]
    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }

    /// Catalogue version token, if the source supplied one
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Zone with exactly this (normalized) name
    #[must_use]
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.get(name)
    }

    /// All zone names, ordered
    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    /// Number of zones
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Returns true if no zone is configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Parse a catalogue document from JSON
    pub fn from_json(bytes: &[u8]) -> crate::Result<Self> {
        serde_json::from_slice(bytes).map_err(crate::ConsoleError::Json)
    }

    /// Serialize to the JSON document form, version token included
    pub fn to_json(&self) -> crate::Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(crate::ConsoleError::Json)
    }
}

/// Lowercase and drop one trailing root dot. DNS names compare
/// case-insensitively.
fn normalize(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase()
}
