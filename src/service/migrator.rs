//! Cache migrator
//!
//! Folds the file-per-entry location cache into the `Location` table.
//! Entries are de-duplicated against the names accepted during the run
//! and against rows already in the database, and written in blocks.

use crate::dao::{LocationDb, Lookup};
use crate::error::{GeoError, Result};
use crate::model::{Location, MAX_NAME_LEN};
use crate::service::LocationCache;
use crate::stats::MigrationStats;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_FLUSH_EVERY: usize = 1000;

/// Progress notifications emitted while converting.
#[derive(Debug)]
pub enum MigrationEvent<'a> {
    Listing,
    Started { files: usize },
    InvalidEntry { key: &'a str, error: &'a GeoError },
    Duplicate { name: &'a str },
    FoundInDb { name: &'a str },
    LookupFailed { name: &'a str, error: &'a rusqlite::Error },
    Inserting { rows: usize },
    Converted { entries: usize },
    Finished { files: usize },
}

pub trait MigrationObserver {
    fn on_event(&mut self, event: &MigrationEvent<'_>);
}

impl<F> MigrationObserver for F
where
    F: FnMut(&MigrationEvent<'_>),
{
    fn on_event(&mut self, event: &MigrationEvent<'_>) {
        self(event)
    }
}

/// Renders migration events as log lines.
pub struct TracingObserver;

impl MigrationObserver for TracingObserver {
    fn on_event(&mut self, event: &MigrationEvent<'_>) {
        match event {
            MigrationEvent::Listing => info!("listing cache entries..."),
            MigrationEvent::Started { files } => info!("going to convert {} entries", files),
            MigrationEvent::InvalidEntry { key, error } => {
                info!("invalid entry for {}: {}", key, error)
            }
            MigrationEvent::Duplicate { name } => info!("skipping {}", name),
            MigrationEvent::FoundInDb { name } => info!("found in db: {}", name),
            MigrationEvent::LookupFailed { name, error } => {
                warn!("lookup of {} failed, skipping: {}", name, error)
            }
            MigrationEvent::Inserting { rows } => {
                info!("going to insert new entries");
                debug!("block size: {}", rows);
            }
            MigrationEvent::Converted { entries } => info!("converted {} entries", entries),
            MigrationEvent::Finished { files } => info!("converted {} entries", files),
        }
    }
}

pub struct CacheMigrator {
    db_path: PathBuf,
    cache_dir: PathBuf,
    flush_every: usize,
}

impl CacheMigrator {
    pub fn new<P: Into<PathBuf>, C: Into<PathBuf>>(db_path: P, cache_dir: C) -> Self {
        Self {
            db_path: db_path.into(),
            cache_dir: cache_dir.into(),
            flush_every: DEFAULT_FLUSH_EVERY,
        }
    }

    /// Sets the file-index cadence of intermediate bulk inserts.
    pub fn with_flush_every(mut self, flush_every: usize) -> Self {
        self.flush_every = flush_every.max(1);
        self
    }

    pub fn convert(&self, reset: bool) -> Result<MigrationStats> {
        self.convert_with(reset, &mut TracingObserver)
    }

    /// Converts the files-based cache into the DB-based cache.
    ///
    /// With `reset` the database file is removed and the table recreated
    /// from scratch. Otherwise rows already present are kept and skipped.
    pub fn convert_with(
        &self,
        reset: bool,
        observer: &mut dyn MigrationObserver,
    ) -> Result<MigrationStats> {
        if reset {
            remove_db_if_exists(&self.db_path)?;
        }

        let mut db = LocationDb::open(&self.db_path)?;
        if reset {
            db.create_table()?;
        } else {
            db.ensure_table()?;
        }

        observer.on_event(&MigrationEvent::Listing);
        let files = list_cache_files(&self.cache_dir)?;
        observer.on_event(&MigrationEvent::Started { files: files.len() });

        let mut stats = MigrationStats::new();
        stats.files = files.len();

        let mut known: HashSet<String> = HashSet::new();
        let mut block: Vec<Location> = Vec::new();

        for (i, path) in files.iter().enumerate() {
            let location = match LocationCache::read_entry(path) {
                Ok(location) => location,
                Err(error) => {
                    stats.invalid += 1;
                    let key = path.file_name().unwrap_or_default().to_string_lossy();
                    observer.on_event(&MigrationEvent::InvalidEntry {
                        key: &key,
                        error: &error,
                    });
                    continue;
                }
            };

            if location.name.len() > MAX_NAME_LEN {
                stats.too_long += 1;
                continue;
            }

            if known.contains(&location.name) {
                stats.duplicates += 1;
                observer.on_event(&MigrationEvent::Duplicate { name: &location.name });
                continue;
            }

            // Only a definite "no rows" lets the entry through.
            match db.lookup(&location.name) {
                Lookup::Absent => {}
                Lookup::Present => {
                    stats.found_in_db += 1;
                    observer.on_event(&MigrationEvent::FoundInDb { name: &location.name });
                    continue;
                }
                Lookup::Failed(error) => {
                    stats.found_in_db += 1;
                    observer.on_event(&MigrationEvent::LookupFailed {
                        name: &location.name,
                        error: &error,
                    });
                    continue;
                }
            }

            known.insert(location.name.clone());

            if location.name.contains('\n') {
                stats.bad_names += 1;
                continue;
            }

            block.push(location);

            // Cadence follows the file index, not the block size.
            if i % self.flush_every != 0 || i == 0 {
                continue;
            }

            observer.on_event(&MigrationEvent::Inserting { rows: block.len() });
            flush(&mut db, &mut block, &mut stats)?;
            observer.on_event(&MigrationEvent::Converted { entries: i + 1 });
        }

        if !block.is_empty() {
            observer.on_event(&MigrationEvent::Inserting { rows: block.len() });
            flush(&mut db, &mut block, &mut stats)?;
        }

        observer.on_event(&MigrationEvent::Finished { files: files.len() });

        Ok(stats)
    }
}

fn flush(db: &mut LocationDb, block: &mut Vec<Location>, stats: &mut MigrationStats) -> Result<()> {
    db.bulk_insert(block)?;
    stats.inserted += block.len();
    stats.flushes += 1;
    block.clear();
    Ok(())
}

fn remove_db_if_exists(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(_) => Ok(fs::remove_file(path)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Lists the entries of `dir`, sorted by file name.
fn list_cache_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<PathBuf>>>()?;
    files.sort();
    Ok(files)
}
