mod ip_cache;
mod location_cache;
pub mod migrator;

pub use ip_cache::IpCache;
pub use location_cache::LocationCache;
pub use migrator::CacheMigrator;
