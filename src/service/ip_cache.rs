//! File-per-IP address cache
//!
//! Each entry lives in `<dir>/<ip>` and holds one `;`-delimited record
//! produced by the upstream geolocation lookup.

use crate::error::{GeoError, Result};
use crate::model::Address;
use std::fs;
use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::debug;

pub struct IpCache {
    dir: PathBuf,
}

impl IpCache {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the cached address for `ip`.
    pub fn read(&self, ip: &str) -> Result<Address> {
        let path = self.entry_path(ip)?;
        let record = match fs::read_to_string(&path) {
            Ok(record) => record,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GeoError::NotFound(ip.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        Address::parse(ip, &record)
    }

    /// Stores `address` under `ip`, replacing any previous entry.
    pub fn put(&self, ip: &str, address: &Address) -> Result<()> {
        let path = self.entry_path(ip)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, address.to_record())?;
        debug!("cached address for {} in {}", ip, path.display());
        Ok(())
    }

    // Only valid IP addresses are accepted so a key can never leave the cache directory.
    fn entry_path(&self, ip: &str) -> Result<PathBuf> {
        ip.parse::<IpAddr>()
            .map_err(|_| GeoError::InvalidKey(ip.to_string()))?;
        Ok(self.dir.join(ip))
    }
}
