//! Location cache with a file-per-entry or database backend

use crate::config::CacheType;
use crate::dao::LocationDb;
use crate::error::{GeoError, Result};
use crate::model::Location;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

enum Backend {
    Files,
    Db(LocationDb),
}

pub struct LocationCache {
    dir: PathBuf,
    backend: Backend,
}

impl LocationCache {
    /// Cache backed by JSON files in `dir`.
    pub fn files<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            backend: Backend::Files,
        }
    }

    /// Cache backed by the `Location` table; `dir` is still used by [`read_file`].
    ///
    /// [`read_file`]: LocationCache::read_file
    pub fn with_db<P: Into<PathBuf>>(dir: P, db: LocationDb) -> Result<Self> {
        db.ensure_table()?;
        Ok(Self {
            dir: dir.into(),
            backend: Backend::Db(db),
        })
    }

    pub fn open<P: Into<PathBuf>>(cache_type: CacheType, dir: P, db_path: &Path) -> Result<Self> {
        match cache_type {
            CacheType::Files => Ok(Self::files(dir)),
            CacheType::Db => Self::with_db(dir, LocationDb::open(db_path)?),
        }
    }

    /// Reads `name` from the configured backend.
    pub fn read(&self, name: &str) -> Result<Location> {
        match &self.backend {
            Backend::Files => self.read_file(name),
            Backend::Db(db) => db
                .get(name)?
                .ok_or_else(|| GeoError::NotFound(name.to_string())),
        }
    }

    /// Reads `name` from the cache directory regardless of the backend.
    pub fn read_file(&self, name: &str) -> Result<Location> {
        let path = self.entry_path(name)?;
        Self::read_entry(&path)
    }

    /// Reads the cache file at `path`; its basename is the fallback name.
    pub fn read_entry(path: &Path) -> Result<Location> {
        let key = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(GeoError::NotFound(key)),
            Err(e) => return Err(e.into()),
        };

        Location::from_json(&key, &data)
    }

    pub fn put(&self, location: &Location) -> Result<()> {
        match &self.backend {
            Backend::Files => {
                let path = self.entry_path(&location.name)?;
                fs::create_dir_all(&self.dir)?;
                fs::write(&path, location.to_json()?)?;
            }
            Backend::Db(db) => db.upsert(location)?,
        }
        debug!("cached location {}", location.name);
        Ok(())
    }

    fn entry_path(&self, name: &str) -> Result<PathBuf> {
        let usable = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\0'])
            && !(cfg!(windows) && name.contains('\\'));
        if !usable {
            return Err(GeoError::InvalidKey(name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}
