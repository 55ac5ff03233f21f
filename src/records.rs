/// Records outside the project scope: properties, time entries and users

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PROPERTIES: &str = "properties";
pub const TIME_ENTRIES: &str = "time_entries";
pub const USERS: &str = "users";

/// Fields matched by the property free-text search
pub const PROPERTY_SEARCH_FIELDS: [&str; 3] = ["bbl", "address", "owner_name"];

/// A tax-lot property row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Borough-block-lot identifier
    #[serde(default)]
    pub bbl: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sum of logged hours; entries without hours count as zero
pub fn total_hours(entries: &[TimeEntry]) -> f64 {
    entries.iter().filter_map(|entry| entry.hours).sum()
}
