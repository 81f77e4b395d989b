mod location_db;

pub use location_db::{LocationDb, Lookup};
