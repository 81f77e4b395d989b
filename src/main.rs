mod cli;
mod config;
mod dao;
mod error;
mod logging;
mod model;
mod service;
mod stats;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use cli::{Args, Command};
use logging::LogSuppressor;
use model::{Address, Location};
use service::{CacheMigrator, IpCache, LocationCache};

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.merge_with_config()?;

    let sink = if config.logging.file.as_os_str().is_empty() {
        None
    } else {
        let sink = Arc::new(LogSuppressor::new(
            &config.logging.file,
            config.logging.suppress.clone(),
            &config.logging.line_prefix,
        ));
        sink.open()
            .with_context(|| format!("cannot open log file {}", config.logging.file.display()))?;
        Some(sink)
    };

    // Initialize logging
    logging::init(args.verbose, sink.clone());

    let result = run(&args.command, &config);
    if let Err(e) = &result {
        error!("{:#}", e);
    }

    if let Some(sink) = sink {
        sink.close().context("cannot close log file")?;
    }

    result
}

fn run(command: &Command, config: &config::Config) -> Result<()> {
    match command {
        Command::Convert { reset } => {
            info!(
                "Converting {} into {} (reset={})",
                config.geo.location_cache_dir.display(),
                config.geo.location_cache_db.display(),
                reset
            );
            let migrator = CacheMigrator::new(
                &config.geo.location_cache_db,
                &config.geo.location_cache_dir,
            )
            .with_flush_every(config.geo.flush_every);

            let stats = migrator.convert(*reset).context("cache conversion failed")?;
            stats.print_summary();
        }
        Command::Ip { ip } => {
            let address = IpCache::new(&config.geo.ip_cache_dir).read(ip)?;
            println!("{}", serde_json::to_string_pretty(&address)?);
        }
        Command::IpPut { ip, record } => {
            let address = Address::parse(ip, record)?;
            IpCache::new(&config.geo.ip_cache_dir).put(ip, &address)?;
            info!("Stored {} for {}", address.to_record(), ip);
        }
        Command::Location { name } => {
            let location = open_location_cache(config)?.read(name)?;
            println!("{}", serde_json::to_string_pretty(&location)?);
        }
        Command::LocationPut { name, json } => {
            // The command line name is the cache key, whatever the JSON says.
            let mut location = Location::from_json(name, json)?;
            location.name = name.clone();
            open_location_cache(config)?.put(&location)?;
            info!("Stored location {}", location.name);
        }
    }

    Ok(())
}

fn open_location_cache(config: &config::Config) -> Result<LocationCache> {
    let cache = LocationCache::open(
        config.geo.location_cache_type,
        &config.geo.location_cache_dir,
        &config.geo.location_cache_db,
    )?;
    Ok(cache)
}
