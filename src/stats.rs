use std::time::{Duration, Instant};

/// Counters collected during one cache migration.
#[derive(Debug, Clone)]
pub struct MigrationStats {
    pub files: usize,
    pub invalid: usize,
    pub too_long: usize,
    pub duplicates: usize,
    pub found_in_db: usize,
    pub bad_names: usize,
    pub inserted: usize,
    pub flushes: usize,
    start_time: Instant,
}

impl MigrationStats {
    pub fn new() -> Self {
        MigrationStats {
            files: 0,
            invalid: 0,
            too_long: 0,
            duplicates: 0,
            found_in_db: 0,
            bad_names: 0,
            inserted: 0,
            flushes: 0,
            start_time: Instant::now(),
        }
    }

    pub fn skipped(&self) -> usize {
        self.invalid + self.too_long + self.duplicates + self.found_in_db + self.bad_names
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn insert_rate(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.inserted as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn print_summary(&self) {
        tracing::info!("=== Migration Summary ===");
        tracing::info!("  Cache files: {}", self.files);
        tracing::info!("  Inserted rows: {}", self.inserted);
        tracing::info!("  Bulk inserts: {}", self.flushes);
        tracing::info!("  Skipped: {}", self.skipped());
        tracing::info!("  Invalid entries: {}", self.invalid);
        tracing::info!("  Names too long: {}", self.too_long);
        tracing::info!("  Duplicates: {}", self.duplicates);
        tracing::info!("  Already in db: {}", self.found_in_db);
        tracing::info!("  Bad names: {}", self.bad_names);
        tracing::info!("  Insert rate: {:.2} rows/sec", self.insert_rate());
        tracing::info!("  Elapsed time: {:.2}s", self.elapsed().as_secs_f64());
    }
}

impl Default for MigrationStats {
    fn default() -> Self {
        Self::new()
    }
}
