//! Durable cache of the last accepted zone catalogue.
//!
//! Written after every accepted change and read once at startup, so a node
//! that restarts while every catalogue source is down still serves its zones.

use console_dns_core::ZoneSet;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::SrvError;

/// JSON file holding one [`ZoneSet`], version token included.
#[derive(Debug, Clone)]
pub struct ZoneCache {
    path: PathBuf,
}

impl ZoneCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached catalogue.
    ///
    /// A missing file is `Ok(None)`: a fresh node has nothing cached yet.
    pub fn load(&self) -> crate::Result<Option<ZoneSet>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SrvError::Cache(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        ZoneSet::from_json(&bytes)
            .map(Some)
            .map_err(|e| SrvError::Snapshot(format!("{}: {e}", self.path.display())))
    }

    /// Replace the cached catalogue.
    ///
    /// The document goes to a staging file first and is renamed over the
    /// cache, so readers see either the old or the new file in full.
    pub fn save(&self, zones: &ZoneSet) -> crate::Result<()> {
        let body = zones
            .to_json()
            .map_err(|e| SrvError::Snapshot(e.to_string()))?;
        let staging = self.staging_path();

        write_private(&staging, &body).map_err(|e| {
            SrvError::Cache(format!("failed to write {}: {e}", staging.display()))
        })?;
        fs::rename(&staging, &self.path).map_err(|e| {
            SrvError::Cache(format!(
                "failed to move {} into place: {e}",
                staging.display()
            ))
        })
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

/// Write `body` readable by the owner only.
fn write_private(path: &Path, body: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(body)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::catalogue;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ZoneCache::new(dir.path().join("zones.json"));
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_round_trip_keeps_every_type_and_etag() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ZoneCache::new(dir.path().join("zones.json"));
        let zones = catalogue();

        cache.save(&zones).unwrap();
        let loaded = cache.load().unwrap().unwrap();

        assert_eq!(loaded, zones);
        assert_eq!(loaded.etag(), Some("\"v1\""));
        let apex = loaded.zone("example.com").unwrap().apex().unwrap();
        assert!(apex.soa.is_some());
        assert_eq!(apex.caa.len(), 1);
    }

    #[test]
    fn test_save_replaces_and_cleans_staging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.json");
        let cache = ZoneCache::new(&path);

        cache.save(&catalogue()).unwrap();
        cache.save(&ZoneSet::empty()).unwrap();

        assert!(cache.load().unwrap().unwrap().is_empty());
        assert!(!dir.path().join("zones.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_cache_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.json");
        ZoneCache::new(&path).save(&catalogue()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_malformed_file_is_snapshot_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.json");
        fs::write(&path, b"{ not json").unwrap();

        let err = ZoneCache::new(&path).load().unwrap_err();
        assert!(matches!(err, SrvError::Snapshot(_)));
    }

    #[test]
    fn test_unreadable_path_is_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file.
        let err = ZoneCache::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, SrvError::Cache(_)));
    }
}
