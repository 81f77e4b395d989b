use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Longest location name accepted into the `Location` table.
pub const MAX_NAME_LEN: usize = 25;

/// Resolved location, keyed by the name it was looked up with.
///
/// Coordinates stay as text so the source precision is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "latitude")]
    pub lat: String,
    #[serde(rename = "longitude")]
    pub lon: String,
    pub timezone: String,
    #[serde(rename = "address")]
    pub display_name: String,
}

impl Location {
    /// Decodes a location cache file. An empty `name` falls back to `key`,
    /// the file's basename.
    pub fn from_json(key: &str, data: &str) -> Result<Self> {
        let mut location: Location = serde_json::from_str(data)?;
        if location.name.is_empty() {
            location.name = key.to_string();
        }
        Ok(location)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoError;

    #[test]
    fn test_from_json() {
        let data = r#"{"name":"hamburg","latitude":"53.5511","longitude":"9.9937",
            "timezone":"Europe/Berlin","address":"Hamburg, Germany"}"#;
        let location = Location::from_json("ignored", data).unwrap();

        assert_eq!(location.name, "hamburg");
        assert_eq!(location.lat, "53.5511");
        assert_eq!(location.lon, "9.9937");
        assert_eq!(location.timezone, "Europe/Berlin");
        assert_eq!(location.display_name, "Hamburg, Germany");
    }

    #[test]
    fn test_from_json_uses_key_without_name() {
        let data = r#"{"latitude":"1","longitude":"2","timezone":"UTC","address":"Nowhere"}"#;
        let location = Location::from_json("nowhere", data).unwrap();
        assert_eq!(location.name, "nowhere");
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(Location::from_json("x", "not json"), Err(GeoError::Decode(_))));
        assert!(matches!(Location::from_json("x", r#"{"name":"x"}"#), Err(GeoError::Decode(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let location = Location {
            name: "paris".to_string(),
            lat: "48.8566".to_string(),
            lon: "2.3522".to_string(),
            timezone: "Europe/Paris".to_string(),
            display_name: "Paris, France".to_string(),
        };
        let json = location.to_json().unwrap();
        assert_eq!(Location::from_json("other", &json).unwrap(), location);
    }
}
