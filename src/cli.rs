use crate::config::Config;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "geo-cache")]
#[command(version = "0.1.0")]
#[command(about = "IP and location geolocation cache tools", long_about = None)]
pub struct Args {
    /// TOML configuration file
    #[arg(short = 'c', long, env = "GEO_CACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// IP cache directory (overrides geo.ip_cache_dir)
    #[arg(long, env = "GEO_IP_CACHE_DIR")]
    pub ip_cache_dir: Option<PathBuf>,

    /// Location cache directory (overrides geo.location_cache_dir)
    #[arg(long, env = "GEO_LOCATION_CACHE_DIR")]
    pub location_cache_dir: Option<PathBuf>,

    /// Location database file (overrides geo.location_cache_db)
    #[arg(short = 'd', long, env = "GEO_LOCATION_CACHE_DB")]
    pub database: Option<PathBuf>,

    /// Log file (overrides logging.file)
    #[arg(long, env = "GEO_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long, env = "GEO_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert the files-based location cache into the database
    Convert {
        /// Remove the database and recreate the table first
        #[arg(long)]
        reset: bool,
    },
    /// Show the cached address of an IP
    Ip { ip: String },
    /// Store a cache record for an IP
    IpPut { ip: String, record: String },
    /// Show a cached location
    Location { name: String },
    /// Store a location given as a JSON cache entry
    LocationPut { name: String, json: String },
}

impl Args {
    /// Loads the config file (if any) and applies command line overrides.
    pub fn merge_with_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(dir) = &self.ip_cache_dir {
            config.geo.ip_cache_dir = dir.clone();
        }
        if let Some(dir) = &self.location_cache_dir {
            config.geo.location_cache_dir = dir.clone();
        }
        if let Some(db) = &self.database {
            config.geo.location_cache_db = db.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = file.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "geo-cache",
            "--database",
            "/tmp/geo.db",
            "--location-cache-dir",
            "/tmp/loc",
            "convert",
            "--reset",
        ]);
        let config = args.merge_with_config().unwrap();

        assert_eq!(config.geo.location_cache_db, PathBuf::from("/tmp/geo.db"));
        assert_eq!(config.geo.location_cache_dir, PathBuf::from("/tmp/loc"));
        assert_eq!(config.geo.ip_cache_dir, PathBuf::from("cache/ip2l"));
        assert!(matches!(args.command, Command::Convert { reset: true }));
    }

    #[test]
    fn test_ip_put_command() {
        let args = Args::parse_from(["geo-cache", "ip-put", "1.2.3.4", "DE;Germany;Hamburg;Hamburg"]);
        match args.command {
            Command::IpPut { ip, record } => {
                assert_eq!(ip, "1.2.3.4");
                assert_eq!(record, "DE;Germany;Hamburg;Hamburg");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_location_put_command() {
        let json = r#"{"latitude":"1","longitude":"2","timezone":"UTC","address":"Nowhere"}"#;
        let args = Args::parse_from(["geo-cache", "location-put", "nowhere", json]);
        match args.command {
            Command::LocationPut { name, json: body } => {
                assert_eq!(name, "nowhere");
                assert_eq!(body, json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
