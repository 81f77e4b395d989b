use crate::error::{GeoError, Result};
use crate::service::migrator::DEFAULT_FLUSH_EVERY;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Backend used for location lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    #[default]
    Files,
    Db,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geo: GeoConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    pub ip_cache_dir: PathBuf,
    pub location_cache_dir: PathBuf,
    pub location_cache_db: PathBuf,
    pub location_cache_type: CacheType,
    pub flush_every: usize,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            ip_cache_dir: PathBuf::from("cache/ip2l"),
            location_cache_dir: PathBuf::from("cache/loc"),
            location_cache_db: PathBuf::from("cache/geo.db"),
            location_cache_type: CacheType::Files,
            flush_every: DEFAULT_FLUSH_EVERY,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; empty means no file
    pub file: PathBuf,
    pub suppress: Vec<String>,
    pub line_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            suppress: Vec::new(),
            // Log lines start with a timestamp such as "2026-..."
            line_prefix: "20".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| GeoError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| GeoError::Config(e.to_string()))?;
        if config.geo.flush_every == 0 {
            return Err(GeoError::Config("geo.flush_every must be positive".to_string()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.geo.flush_every, 1000);
        assert_eq!(config.geo.location_cache_type, CacheType::Files);
        assert!(config.logging.file.as_os_str().is_empty());
        assert_eq!(config.logging.line_prefix, "20");
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            [geo]
            ip_cache_dir = "/var/cache/ip"
            location_cache_dir = "/var/cache/loc"
            location_cache_db = "/var/cache/geo.db"
            location_cache_type = "db"
            flush_every = 500

            [logging]
            file = "/var/log/geo.log"
            suppress = ["TLS handshake error", "GET /health"]
            line_prefix = "["
            "#,
        )
        .unwrap();

        assert_eq!(config.geo.ip_cache_dir, PathBuf::from("/var/cache/ip"));
        assert_eq!(config.geo.location_cache_type, CacheType::Db);
        assert_eq!(config.geo.flush_every, 500);
        assert_eq!(config.logging.suppress.len(), 2);
        assert_eq!(config.logging.line_prefix, "[");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(Config::from_toml("[geo]\nflush_every = 0"), Err(GeoError::Config(_))));
        assert!(matches!(
            Config::from_toml("[geo]\nlocation_cache_type = \"redis\""),
            Err(GeoError::Config(_))
        ));
        assert!(matches!(
            Config::load(Path::new("/nonexistent/geo-cache.toml")),
            Err(GeoError::Config(_))
        ));
    }
}
