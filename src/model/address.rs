use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};

/// Coordinate value used when a cache record carries no latitude/longitude.
pub const MISSING_COORDINATE: f64 = -1000.0;

const FIELD_DELIMITER: char = ';';

/// Geographic address of a client IP, as stored in the IP cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub ip: String,
    pub country_code: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Address {
    /// Parses a cache record of the form `CC;Country;Region;City[;Lat;Lon[;...]]`.
    ///
    /// Fields are taken verbatim. Records with 4 or 5 fields have no
    /// coordinates and get [`MISSING_COORDINATE`] for both. Anything past
    /// the sixth field (AS number, ISP, domain) is ignored.
    pub fn parse(ip: &str, record: &str) -> Result<Self> {
        let fields: Vec<&str> = record.split(FIELD_DELIMITER).collect();
        if fields.len() < 4 {
            return Err(GeoError::InvalidCacheEntry);
        }

        let (latitude, longitude) = if fields.len() >= 6 {
            (parse_coordinate(fields[4])?, parse_coordinate(fields[5])?)
        } else {
            (MISSING_COORDINATE, MISSING_COORDINATE)
        };

        Ok(Address {
            ip: ip.to_string(),
            country_code: fields[0].to_string(),
            country: fields[1].to_string(),
            region: fields[2].to_string(),
            city: fields[3].to_string(),
            latitude,
            longitude,
        })
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude != MISSING_COORDINATE && self.longitude != MISSING_COORDINATE
    }

    /// Renders the address back into the cache record format.
    pub fn to_record(&self) -> String {
        let mut record = format!(
            "{};{};{};{}",
            self.country_code, self.country, self.region, self.city
        );
        if self.has_coordinates() {
            record.push_str(&format!(";{};{}", self.latitude, self.longitude));
        }
        record
    }
}

fn parse_coordinate(field: &str) -> Result<f64> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(GeoError::InvalidCacheEntry),
    }
}
